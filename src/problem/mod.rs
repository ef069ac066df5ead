//! Optimisation problems
//!
//! This module provides the `Problem` trait, domain bounds and a few
//! benchmark problems.

pub mod benchmarks;
pub mod bounds;
pub mod traits;

pub mod prelude {
    pub use super::benchmarks::*;
    pub use super::bounds::*;
    pub use super::traits::*;
}
