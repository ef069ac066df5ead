//! Identity algorithm

use crate::algorithms::traits::Algorithm;
use crate::error::EvoResult;
use crate::population::population::Population;

/// Algorithm that leaves the population untouched
///
/// Useful to measure the engine itself and as a placeholder island.
#[derive(Clone, Debug, Default)]
pub struct NoOp;

impl NoOp {
    pub fn new() -> Self {
        Self
    }
}

impl Algorithm for NoOp {
    fn name(&self) -> &str {
        "No-op"
    }

    fn evolve(&mut self, _population: &mut Population) -> EvoResult<()> {
        Ok(())
    }

    fn box_clone(&self) -> Box<dyn Algorithm> {
        Box::new(self.clone())
    }
}
