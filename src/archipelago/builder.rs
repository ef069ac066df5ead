//! Archipelago configuration and builder

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::algorithms::traits::Algorithm;
use crate::archipelago::archipelago::Archipelago;
use crate::archipelago::island::Island;
use crate::archipelago::migration::{MigrantReplacement, MigrantSelection, StandardMigration};
use crate::archipelago::topology::TopologyKind;
use crate::error::{EvoResult, EvolutionError};
use crate::problem::traits::Problem;

/// Configuration for a homogeneous archipelago
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchipelagoConfig {
    /// Number of islands
    pub num_islands: usize,
    /// Population size per island
    pub island_population_size: usize,
    /// Generations between migrations
    pub generations_per_round: u64,
    /// Number of evolve/migrate rounds
    pub rounds: usize,
    /// Migration topology
    pub topology: TopologyKind,
    /// Which individuals emigrate
    pub selection: MigrantSelection,
    /// How immigrants are inserted
    pub replacement: MigrantReplacement,
    /// Seed for initial populations and the migration policy
    pub seed: Option<u64>,
}

impl Default for ArchipelagoConfig {
    fn default() -> Self {
        Self {
            num_islands: 4,
            island_population_size: 20,
            generations_per_round: 10,
            rounds: 10,
            topology: TopologyKind::Ring,
            selection: MigrantSelection::Best(1),
            replacement: MigrantReplacement::ReplaceWorst,
            seed: None,
        }
    }
}

impl ArchipelagoConfig {
    /// Parse a JSON configuration; missing fields take their defaults
    pub fn from_json(json: &str) -> EvoResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            EvolutionError::InvalidArgument(format!("invalid archipelago configuration: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EvoResult<()> {
        if self.num_islands == 0 {
            return Err(EvolutionError::InvalidArgument(
                "an archipelago needs at least one island".to_string(),
            ));
        }
        if let TopologyKind::Star { hub } = self.topology {
            if hub >= self.num_islands {
                return Err(EvolutionError::InvalidArgument(format!(
                    "star hub {hub} outside of {} islands",
                    self.num_islands
                )));
            }
        }
        Ok(())
    }

    /// Migration policy described by this configuration
    pub fn migration_policy(&self) -> StandardMigration {
        match self.seed {
            Some(seed) => StandardMigration::with_seed(
                self.selection.clone(),
                self.replacement.clone(),
                seed,
            ),
            None => StandardMigration::new(self.selection.clone(), self.replacement.clone()),
        }
    }
}

/// Builder for [`Archipelago`]
///
/// Every island gets the same problem and its own clone of the algorithm.
#[derive(Debug, Default)]
pub struct ArchipelagoBuilder {
    config: ArchipelagoConfig,
    problem: Option<Arc<dyn Problem>>,
    algorithm: Option<Box<dyn Algorithm>>,
}

impl ArchipelagoBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn from_config(config: ArchipelagoConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Set number of islands
    pub fn num_islands(mut self, n: usize) -> Self {
        self.config.num_islands = n;
        self
    }

    /// Set population size per island
    pub fn island_population_size(mut self, size: usize) -> Self {
        self.config.island_population_size = size;
        self
    }

    pub fn topology(mut self, topology: TopologyKind) -> Self {
        self.config.topology = topology;
        self
    }

    /// Seed the initial populations; island `i` uses `seed + i`
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn problem(mut self, problem: Arc<dyn Problem>) -> Self {
        self.problem = Some(problem);
        self
    }

    pub fn algorithm(mut self, algorithm: &dyn Algorithm) -> Self {
        self.algorithm = Some(algorithm.box_clone());
        self
    }

    pub fn config(&self) -> &ArchipelagoConfig {
        &self.config
    }

    pub fn build(self) -> EvoResult<Archipelago> {
        let problem = self.problem.ok_or(EvolutionError::InvalidArgument(
            "a problem is required".to_string(),
        ))?;
        let algorithm = self.algorithm.ok_or(EvolutionError::InvalidArgument(
            "an algorithm is required".to_string(),
        ))?;
        self.config.validate()?;

        let size = i64::try_from(self.config.island_population_size).map_err(|_| {
            EvolutionError::InvalidArgument(format!(
                "population size {} is too large",
                self.config.island_population_size
            ))
        })?;
        let islands = (0..self.config.num_islands)
            .map(|i| match self.config.seed {
                Some(seed) => Island::with_seed(
                    Arc::clone(&problem),
                    algorithm.as_ref(),
                    size,
                    seed.wrapping_add(i as u64),
                ),
                None => Island::new(Arc::clone(&problem), algorithm.as_ref(), size),
            })
            .collect::<EvoResult<Vec<_>>>()?;

        let topology = self.config.topology.build(self.config.num_islands)?;
        tracing::info!(
            islands = self.config.num_islands,
            population = self.config.island_population_size,
            topology = ?self.config.topology,
            "archipelago built"
        );
        Archipelago::new(topology, islands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::differential_evolution::DifferentialEvolution;
    use crate::problem::benchmarks::Sphere;

    #[test]
    fn test_config_from_json_defaults() {
        let config = ArchipelagoConfig::from_json(r#"{"num_islands": 6, "seed": 3}"#).unwrap();
        assert_eq!(config.num_islands, 6);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.topology, TopologyKind::Ring);
        assert_eq!(config.island_population_size, 20);
    }

    #[test]
    fn test_config_from_json_enums() {
        let config = ArchipelagoConfig::from_json(
            r#"{"topology": {"Star": {"hub": 1}}, "selection": {"Random": 3}, "replacement": "Append"}"#,
        )
        .unwrap();
        assert_eq!(config.topology, TopologyKind::Star { hub: 1 });
        assert_eq!(config.selection, MigrantSelection::Random(3));
        assert_eq!(config.replacement, MigrantReplacement::Append);
    }

    #[test]
    fn test_config_rejects_invalid() {
        assert!(ArchipelagoConfig::from_json("{not json").is_err());
        assert!(ArchipelagoConfig::from_json(r#"{"num_islands": 0}"#).is_err());
        assert!(
            ArchipelagoConfig::from_json(r#"{"num_islands": 2, "topology": {"Star": {"hub": 2}}}"#)
                .is_err()
        );
    }

    #[test]
    fn test_builder() {
        let archipelago = ArchipelagoBuilder::new()
            .num_islands(4)
            .island_population_size(8)
            .topology(TopologyKind::Ring)
            .seed(42)
            .problem(Arc::new(Sphere::new(3)))
            .algorithm(&DifferentialEvolution::default())
            .build()
            .unwrap();

        assert_eq!(archipelago.len(), 4);
        assert_eq!(archipelago.topology().num_edges(), 8);
        for island in archipelago.islands() {
            assert_eq!(island.population_size().unwrap(), 8);
            assert!(island.belongs_to_archipelago());
        }
    }

    #[test]
    fn test_builder_requires_problem() {
        let result = ArchipelagoBuilder::new()
            .algorithm(&DifferentialEvolution::default())
            .build();
        assert!(matches!(result, Err(EvolutionError::InvalidArgument(_))));
    }

    #[test]
    fn test_seeded_builds_are_reproducible() {
        let build = || {
            ArchipelagoBuilder::new()
                .num_islands(2)
                .island_population_size(5)
                .seed(7)
                .problem(Arc::new(Sphere::new(2)))
                .algorithm(&DifferentialEvolution::default())
                .build()
                .unwrap()
        };
        let a = build();
        let b = build();
        assert_eq!(
            a.island(1).unwrap().population().unwrap().snapshot(),
            b.island(1).unwrap().population().unwrap().snapshot()
        );
    }
}
