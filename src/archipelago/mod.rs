//! Island model
//!
//! Islands evolve their populations asynchronously; an archipelago wires
//! them together with a topology and exchanges individuals between them
//! in migration rounds.

#[allow(clippy::module_inception)]
pub mod archipelago;
pub mod builder;
pub mod island;
pub mod migration;
pub mod topology;

pub mod prelude {
    pub use super::archipelago::{Archipelago, IslandStats};
    pub use super::builder::{ArchipelagoBuilder, ArchipelagoConfig};
    pub use super::island::Island;
    pub use super::migration::{
        MigrantReplacement, MigrantSelection, MigrationPolicy, MigrationRecord, MigrationReport,
        StandardMigration,
    };
    pub use super::topology::{Edge, Topology, TopologyKind};
}
