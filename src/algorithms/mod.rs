//! Search algorithms
//!
//! This module provides the `Algorithm` trait that islands drive, plus a few
//! reference implementations.

pub mod differential_evolution;
pub mod hill_climber;
pub mod no_op;
pub mod traits;

pub mod prelude {
    pub use super::differential_evolution::*;
    pub use super::hill_climber::*;
    pub use super::no_op::*;
    pub use super::traits::*;
}
