//! # evo-archipelago
//!
//! Island-model parallel optimisation for Rust.
//!
//! Independent populations (islands) are evolved concurrently by search
//! algorithms and periodically exchange individuals (migration) along the
//! edges of a topology.
//!
//! ## Core Concepts
//!
//! - **Problems**: box-constrained, minimised objective functions behind the `Problem` trait
//! - **Islands**: a population plus a private algorithm, evolved on a background thread
//!   with an explicit `evolve` / `join` protocol
//! - **Archipelagos**: ordered islands, a directed weighted topology and migration rounds
//! - **Champions**: every population remembers the best individual it has ever seen
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use evo_archipelago::prelude::*;
//! use std::sync::Arc;
//!
//! let mut archipelago = ArchipelagoBuilder::new()
//!     .num_islands(4)
//!     .island_population_size(20)
//!     .topology(TopologyKind::Ring)
//!     .problem(Arc::new(Rastrigin::new(10)))
//!     .algorithm(&DifferentialEvolution::default())
//!     .build()?;
//!
//! let mut policy = StandardMigration::new(MigrantSelection::Best(2), MigrantReplacement::ReplaceWorst);
//! archipelago.evolve_and_migrate(10, 50, &mut policy)?;
//! println!("{:?}", archipelago.champion()?);
//! ```

pub mod algorithms;
pub mod archipelago;
pub mod checkpoint;
pub mod error;
pub mod population;
pub mod problem;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithms::prelude::*;
    pub use crate::archipelago::prelude::*;
    pub use crate::checkpoint::prelude::*;
    pub use crate::error::*;
    pub use crate::population::prelude::*;
    pub use crate::problem::prelude::*;
}
