//! Box constraints for decision vectors
//!
//! Problems describe their domain as one closed interval per decision
//! variable. Populations draw initial decision vectors from these intervals
//! and algorithms clamp their variations back into them.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::{EvoResult, EvolutionError};

/// Closed interval for a single decision variable
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Lower bound (inclusive)
    pub min: f64,
    /// Upper bound (inclusive)
    pub max: f64,
}

impl Bounds {
    /// Create new bounds, rejecting inverted or non-finite intervals
    pub fn new(min: f64, max: f64) -> EvoResult<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(EvolutionError::InvalidArgument(format!(
                "bounds must be finite, got [{min}, {max}]"
            )));
        }
        if min > max {
            return Err(EvolutionError::InvalidArgument(format!(
                "lower bound {min} exceeds upper bound {max}"
            )));
        }
        Ok(Self { min, max })
    }

    /// Symmetric interval `[-half_width, half_width]`
    pub fn symmetric(half_width: f64) -> Self {
        let half_width = half_width.abs();
        Self {
            min: -half_width,
            max: half_width,
        }
    }

    /// Width of the interval
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Draw a uniform value from the interval
    pub fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        if self.range() == 0.0 {
            self.min
        } else {
            rng.gen_range(self.min..=self.max)
        }
    }
}

/// Per-variable bounds of a decision space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiBounds {
    /// Bounds for each dimension
    pub bounds: Vec<Bounds>,
}

impl MultiBounds {
    pub fn new(bounds: Vec<Bounds>) -> Self {
        Self { bounds }
    }

    /// The same interval repeated for every dimension
    pub fn uniform(bound: Bounds, dimension: usize) -> Self {
        Self {
            bounds: vec![bound; dimension],
        }
    }

    pub fn symmetric(half_width: f64, dimension: usize) -> Self {
        Self::uniform(Bounds::symmetric(half_width), dimension)
    }

    pub fn dimension(&self) -> usize {
        self.bounds.len()
    }

    pub fn get(&self, index: usize) -> Option<&Bounds> {
        self.bounds.get(index)
    }

    /// Largest interval width across all dimensions
    pub fn max_range(&self) -> f64 {
        self.bounds.iter().map(Bounds::range).fold(0.0, f64::max)
    }

    /// Draw a uniformly distributed decision vector
    pub fn sample_vec(&self, rng: &mut dyn RngCore) -> Vec<f64> {
        self.bounds.iter().map(|b| b.sample(rng)).collect()
    }

    /// Clamp a vector in place; extra trailing values are left untouched
    pub fn clamp_vec(&self, values: &mut [f64]) {
        for (value, b) in values.iter_mut().zip(&self.bounds) {
            *value = b.clamp(*value);
        }
    }

    /// True if the vector has the right length and every value is in range
    pub fn contains_vec(&self, values: &[f64]) -> bool {
        values.len() == self.bounds.len()
            && values.iter().zip(&self.bounds).all(|(&v, b)| b.contains(v))
    }
}

impl FromIterator<Bounds> for MultiBounds {
    fn from_iter<I: IntoIterator<Item = Bounds>>(iter: I) -> Self {
        Self {
            bounds: iter.into_iter().collect(),
        }
    }
}
