//! Snapshot state structures
//!
//! Snapshots are plain serde values taken from joined islands. They carry
//! no live state: restoring one always rebuilds fresh islands.

use serde::{Deserialize, Serialize};

use crate::archipelago::migration::MigrationRecord;
use crate::archipelago::topology::Topology;
use crate::population::individual::{Champion, Individual};

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Individuals and champion of one population
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopulationSnapshot {
    pub individuals: Vec<Individual>,
    pub champion: Option<Champion>,
}

/// Complete state of a joined island
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IslandSnapshot {
    /// Schema version for forward compatibility
    pub version: u32,
    /// Name of the problem the population was evaluated on
    pub problem: String,
    /// Description of the algorithm at snapshot time
    pub algorithm: String,
    /// Whether the island belonged to a live archipelago
    pub belongs_to_archipelago: bool,
    /// Generations evolved so far
    pub evolution_time: u64,
    /// Wall-clock time spent evolving, in milliseconds
    pub evolution_duration_ms: f64,
    pub population: PopulationSnapshot,
}

impl IslandSnapshot {
    /// Check if the snapshot can be read by this version
    pub fn is_compatible(&self) -> bool {
        self.version <= SNAPSHOT_VERSION
    }
}

/// State of every island of an archipelago plus its wiring
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArchipelagoSnapshot {
    pub version: u32,
    pub islands: Vec<IslandSnapshot>,
    pub topology: Topology,
    pub migration_history: Vec<MigrationRecord>,
    /// Completed rounds, which may exceed the recorded history once it
    /// has been cleared
    #[serde(default)]
    pub migration_rounds: u64,
}

impl ArchipelagoSnapshot {
    pub fn is_compatible(&self) -> bool {
        self.version <= SNAPSHOT_VERSION && self.islands.iter().all(IslandSnapshot::is_compatible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_island() -> IslandSnapshot {
        IslandSnapshot {
            version: SNAPSHOT_VERSION,
            problem: "Sphere".to_string(),
            algorithm: "Algorithm name: No-op".to_string(),
            belongs_to_archipelago: false,
            evolution_time: 3,
            evolution_duration_ms: 0.5,
            population: PopulationSnapshot {
                individuals: vec![Individual::new(vec![1.0], vec![0.0], vec![1.0])],
                champion: Some(Champion {
                    decision: vec![1.0],
                    fitness: vec![1.0],
                }),
            },
        }
    }

    #[test]
    fn test_island_snapshot_compatibility() {
        let mut snapshot = sample_island();
        assert!(snapshot.is_compatible());
        snapshot.version = SNAPSHOT_VERSION + 1;
        assert!(!snapshot.is_compatible());
    }

    #[test]
    fn test_island_snapshot_json() {
        let snapshot = sample_island();
        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: IslandSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn test_archipelago_snapshot_compatibility() {
        let snapshot = ArchipelagoSnapshot {
            version: SNAPSHOT_VERSION,
            islands: vec![sample_island()],
            topology: Topology::unconnected(1),
            migration_history: Vec::new(),
            migration_rounds: 0,
        };
        assert!(snapshot.is_compatible());
    }
}
