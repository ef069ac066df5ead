//! Benchmark problems
//!
//! Standard test functions used to exercise islands and archipelagos. All of
//! them are minimised.

use std::f64::consts::PI;

use crate::problem::bounds::MultiBounds;
use crate::problem::traits::Problem;

/// Sphere function: f(x) = Σxᵢ²
///
/// Unimodal, convex, separable. Optimum at origin.
#[derive(Clone, Debug)]
pub struct Sphere {
    bounds: MultiBounds,
}

impl Sphere {
    /// Create a new Sphere function on `[-5.12, 5.12]^dimension`
    pub fn new(dimension: usize) -> Self {
        Self {
            bounds: MultiBounds::symmetric(5.12, dimension),
        }
    }

    /// Create a Sphere function on custom bounds
    pub fn with_bounds(bounds: MultiBounds) -> Self {
        Self { bounds }
    }
}

impl Problem for Sphere {
    fn name(&self) -> &str {
        "Sphere"
    }

    fn bounds(&self) -> &MultiBounds {
        &self.bounds
    }

    fn objective(&self, decision: &[f64]) -> Vec<f64> {
        vec![decision.iter().map(|x| x * x).sum()]
    }
}

/// Rastrigin function: f(x) = 10n + Σ(xᵢ² - 10cos(2πxᵢ))
///
/// Highly multimodal with many local minima. Optimum at origin.
#[derive(Clone, Debug)]
pub struct Rastrigin {
    bounds: MultiBounds,
}

impl Rastrigin {
    pub fn new(dimension: usize) -> Self {
        Self {
            bounds: MultiBounds::symmetric(5.12, dimension),
        }
    }
}

impl Problem for Rastrigin {
    fn name(&self) -> &str {
        "Rastrigin"
    }

    fn bounds(&self) -> &MultiBounds {
        &self.bounds
    }

    fn objective(&self, decision: &[f64]) -> Vec<f64> {
        let a = 10.0;
        let n = decision.len() as f64;
        let sum: f64 = decision
            .iter()
            .map(|x| x * x - a * (2.0 * PI * x).cos())
            .sum();
        vec![a * n + sum]
    }
}

/// Rosenbrock function: f(x) = Σ[100(xᵢ₊₁-xᵢ²)² + (1-xᵢ)²]
///
/// Narrow curved valley. Optimum at (1, ..., 1).
#[derive(Clone, Debug)]
pub struct Rosenbrock {
    bounds: MultiBounds,
}

impl Rosenbrock {
    pub fn new(dimension: usize) -> Self {
        Self {
            bounds: MultiBounds::symmetric(5.0, dimension),
        }
    }
}

impl Problem for Rosenbrock {
    fn name(&self) -> &str {
        "Rosenbrock"
    }

    fn bounds(&self) -> &MultiBounds {
        &self.bounds
    }

    fn objective(&self, decision: &[f64]) -> Vec<f64> {
        let value = decision
            .windows(2)
            .map(|w| 100.0 * (w[1] - w[0] * w[0]).powi(2) + (1.0 - w[0]).powi(2))
            .sum();
        vec![value]
    }
}

/// Schaffer's first bi-objective problem: f₁ = x², f₂ = (x - 2)²
///
/// The Pareto front is x ∈ [0, 2].
#[derive(Clone, Debug)]
pub struct Schaffer {
    bounds: MultiBounds,
}

impl Schaffer {
    pub fn new() -> Self {
        Self {
            bounds: MultiBounds::symmetric(10.0, 1),
        }
    }
}

impl Default for Schaffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Problem for Schaffer {
    fn name(&self) -> &str {
        "Schaffer"
    }

    fn fitness_dimension(&self) -> usize {
        2
    }

    fn bounds(&self) -> &MultiBounds {
        &self.bounds
    }

    fn objective(&self, decision: &[f64]) -> Vec<f64> {
        let x = decision.first().copied().unwrap_or(0.0);
        vec![x * x, (x - 2.0) * (x - 2.0)]
    }
}
