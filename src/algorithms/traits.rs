//! Algorithm traits
//!
//! An algorithm advances a population by one iteration. Islands own their
//! algorithm exclusively and run it on a background thread, so algorithms
//! must be `Send` and must be able to duplicate themselves.

use std::fmt::Debug;

use crate::error::EvoResult;
use crate::population::population::Population;

/// Search algorithm driven by an island
pub trait Algorithm: Send + Debug {
    /// Short name of the algorithm
    fn name(&self) -> &str;

    /// Run one iteration, mutating the population in place
    ///
    /// Errors abort the running evolution and are reported by the island's
    /// next `join`.
    fn evolve(&mut self, population: &mut Population) -> EvoResult<()>;

    /// Independent deep copy, including any internal random state
    fn box_clone(&self) -> Box<dyn Algorithm>;

    /// Human readable description, rendered by islands
    fn description(&self) -> String {
        format!("Algorithm name: {}", self.name())
    }
}

impl Clone for Box<dyn Algorithm> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}
