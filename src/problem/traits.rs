//! Problem traits
//!
//! A problem is the objective an archipelago optimises. It owns the
//! decision-space domain, evaluates fitness vectors and defines the ordering
//! used for champion tracking and migration.

use std::fmt::Debug;

use rand::RngCore;

use crate::problem::bounds::MultiBounds;

/// Optimisation problem shared by every population that works on it
///
/// Problems are immutable once built and are shared behind an `Arc`, so they
/// must be `Send + Sync`. All objectives are minimised.
pub trait Problem: Send + Sync + Debug {
    /// Short name of the problem
    fn name(&self) -> &str;

    /// Number of decision variables
    fn dimension(&self) -> usize {
        self.bounds().dimension()
    }

    /// Number of objectives
    fn fitness_dimension(&self) -> usize {
        1
    }

    /// Box constraints of the decision space
    fn bounds(&self) -> &MultiBounds;

    /// Evaluate the objective vector of a decision vector
    fn objective(&self, decision: &[f64]) -> Vec<f64>;

    /// Returns true if fitness `a` is strictly better than fitness `b`
    ///
    /// Single-objective problems compare the first objective. Multi-objective
    /// problems use Pareto dominance: `a` is no worse in every objective and
    /// strictly better in at least one.
    fn compare_fitness(&self, a: &[f64], b: &[f64]) -> bool {
        if self.fitness_dimension() == 1 {
            match (a.first(), b.first()) {
                (Some(fa), Some(fb)) => fa < fb,
                _ => false,
            }
        } else {
            pareto_dominates(a, b)
        }
    }

    /// Draw a decision vector from the domain
    fn random_decision(&self, rng: &mut dyn RngCore) -> Vec<f64> {
        self.bounds().sample_vec(rng)
    }

    /// Check that a decision vector belongs to the domain
    fn verify_decision(&self, decision: &[f64]) -> bool {
        self.bounds().contains_vec(decision)
    }

    /// Human readable description, rendered by islands
    fn description(&self) -> String {
        let bounds = self.bounds();
        let lower: Vec<f64> = bounds.bounds.iter().map(|b| b.min).collect();
        let upper: Vec<f64> = bounds.bounds.iter().map(|b| b.max).collect();
        format!(
            "Problem name: {}\n\tGlobal dimension:\t{}\n\tFitness dimension:\t{}\n\tLower bounds:\t\t{}\n\tUpper bounds:\t\t{}",
            self.name(),
            self.dimension(),
            self.fitness_dimension(),
            format_vector(&lower),
            format_vector(&upper),
        )
    }
}

/// Pareto dominance for minimised objectives
pub fn pareto_dominates(a: &[f64], b: &[f64]) -> bool {
    if a.len() != b.len() || a.is_empty() {
        return false;
    }
    let no_worse = a.iter().zip(b).all(|(x, y)| x <= y);
    let strictly_better = a.iter().zip(b).any(|(x, y)| x < y);
    no_worse && strictly_better
}

/// Render a vector as `[a, b, c]`
pub fn format_vector(values: &[f64]) -> String {
    let items: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", items.join(", "))
}
