//! Archipelago: islands wired together by a migration topology

use std::collections::btree_map::{BTreeMap, Entry};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::algorithms::traits::Algorithm;
use crate::archipelago::island::Island;
use crate::archipelago::migration::{MigrationPolicy, MigrationRecord, MigrationReport};
use crate::archipelago::topology::Topology;
use crate::checkpoint::{ArchipelagoSnapshot, SNAPSHOT_VERSION};
use crate::error::{EvoResult, EvolutionError, SnapshotError};
use crate::population::individual::Champion;
use crate::population::population::Population;
use crate::problem::traits::Problem;

/// Identity shared, weakly, with every member island
#[derive(Debug)]
pub(crate) struct ArchipelagoId;

/// An ordered collection of islands plus the topology connecting them
///
/// Island indices are stable: islands are only ever appended. Every
/// island's archipelago link points back here for as long as the
/// archipelago is alive.
pub struct Archipelago {
    islands: Vec<Island>,
    topology: Topology,
    migration_history: Vec<MigrationRecord>,
    migration_rounds: u64,
    id: Arc<ArchipelagoId>,
}

/// Summary of one island
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IslandStats {
    pub index: usize,
    /// Generations evolved
    pub evolution_time: u64,
    pub population_size: usize,
    /// Mean of the first objective, `None` for an empty population
    pub mean_fitness: Option<f64>,
    /// Fitness of the best individual currently in the population
    pub best_fitness: Option<Vec<f64>>,
    /// Fitness of the island champion
    pub champion_fitness: Option<Vec<f64>>,
}

impl Archipelago {
    /// Empty archipelago with an empty topology
    pub fn empty() -> Self {
        Self {
            islands: Vec::new(),
            topology: Topology::default(),
            migration_history: Vec::new(),
            migration_rounds: 0,
            id: Arc::new(ArchipelagoId),
        }
    }

    /// Build an archipelago from islands and a topology over them
    ///
    /// The topology may have fewer vertices than there are islands; the
    /// missing ones are added unconnected.
    pub fn new(topology: Topology, islands: Vec<Island>) -> EvoResult<Self> {
        let mut archipelago = Self::empty();
        for island in islands {
            archipelago.add_island(island)?;
        }
        archipelago.set_topology(topology)?;
        Ok(archipelago)
    }

    /// Append an island and return its index
    ///
    /// A vertex is added to the topology if it does not have one for the new
    /// index. Islands must optimise problems of the same dimensions so that
    /// migrants fit everywhere.
    pub fn add_island(&mut self, mut island: Island) -> EvoResult<usize> {
        if let Some(first) = self.islands.first() {
            check_compatible(first.problem(), island.problem())?;
        }
        let index = self.islands.len();
        self.topology.ensure_vertices(index + 1);
        island.attach(&self.id, index);
        self.islands.push(island);
        tracing::debug!(index, "island added to archipelago");
        Ok(index)
    }

    /// Append an island wired in both directions to existing `neighbours`
    pub fn add_island_connected(&mut self, island: Island, neighbours: &[usize]) -> EvoResult<usize> {
        let size = self.islands.len();
        if let Some(&index) = neighbours.iter().find(|&&n| n >= size) {
            return Err(EvolutionError::InvalidArgument(format!(
                "neighbour {index} is not an island of this archipelago ({size} islands)"
            )));
        }
        let index = self.add_island(island)?;
        for &neighbour in neighbours {
            self.topology.add_edge(index, neighbour)?;
            self.topology.add_edge(neighbour, index)?;
        }
        Ok(index)
    }

    /// Replace the topology
    pub fn set_topology(&mut self, topology: Topology) -> EvoResult<()> {
        self.check_topology(&topology)?;
        self.topology = topology;
        self.topology.ensure_vertices(self.islands.len());
        Ok(())
    }

    /// Add or reweight the migration route `from -> to`
    pub fn connect(&mut self, from: usize, to: usize, weight: f64) -> EvoResult<()> {
        self.topology.add_weighted_edge(from, to, weight)
    }

    /// Remove the migration route `from -> to`, if present
    ///
    /// Routes with an endpoint outside the archipelago are absent, so
    /// removing them is a no-op.
    pub fn disconnect(&mut self, from: usize, to: usize) -> EvoResult<()> {
        self.topology.remove_edge(from, to)
    }

    pub fn len(&self) -> usize {
        self.islands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.islands.is_empty()
    }

    pub fn island(&self, index: usize) -> EvoResult<&Island> {
        let size = self.islands.len();
        self.islands
            .get(index)
            .ok_or(EvolutionError::OutOfRange { index, size })
    }

    pub fn island_mut(&mut self, index: usize) -> EvoResult<&mut Island> {
        let size = self.islands.len();
        self.islands
            .get_mut(index)
            .ok_or(EvolutionError::OutOfRange { index, size })
    }

    pub fn islands(&self) -> impl Iterator<Item = &Island> {
        self.islands.iter()
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Islands that island `index` sends migrants to
    pub fn neighbours(&self, index: usize) -> EvoResult<Vec<usize>> {
        self.topology.targets(index)
    }

    /// Every migration delivery so far, oldest first
    pub fn migration_history(&self) -> &[MigrationRecord] {
        &self.migration_history
    }

    /// Take the recorded deliveries, leaving the history empty
    ///
    /// The round counter keeps running, so later records still carry
    /// increasing round numbers.
    pub fn clear_migration_history(&mut self) -> Vec<MigrationRecord> {
        std::mem::take(&mut self.migration_history)
    }

    /// Number of completed migration rounds
    pub fn migration_rounds(&self) -> u64 {
        self.migration_rounds
    }

    /// Whether any island has an unjoined evolution
    pub fn is_busy(&self) -> bool {
        self.islands.iter().any(Island::is_busy)
    }

    /// Start evolving every island for `generations` iterations
    pub fn evolve(&mut self, generations: u64) -> EvoResult<()> {
        self.ensure_joined()?;
        tracing::debug!(islands = self.islands.len(), generations, "archipelago evolution started");
        for island in &mut self.islands {
            island.evolve(generations)?;
        }
        Ok(())
    }

    /// Join every island
    ///
    /// All islands are joined even when one fails; the first failure is
    /// returned.
    pub fn join(&self) -> EvoResult<()> {
        let mut first_error = None;
        for (index, island) in self.islands.iter().enumerate() {
            if let Err(e) = island.join() {
                tracing::warn!(index, error = %e, "island failed during evolution");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Run one migration round
    ///
    /// Every island must be joined, otherwise nothing moves and
    /// [`EvolutionError::Busy`] is returned. Emigrants are selected from
    /// all sources before any population is modified, then delivered along
    /// each outgoing edge the policy decides to use.
    ///
    /// Deliveries go to working copies of the destination populations,
    /// which replace the originals only once every delivery succeeded. A
    /// failing round leaves populations, history and round counter
    /// untouched.
    pub fn migrate(&mut self, policy: &mut dyn MigrationPolicy) -> EvoResult<MigrationReport> {
        self.ensure_joined()?;
        let round = self.migration_rounds;

        let mut emigrants = Vec::with_capacity(self.islands.len());
        for (source, island) in self.islands.iter().enumerate() {
            let selected = if self.topology.outgoing(source)?.is_empty() {
                Vec::new()
            } else {
                island.read_population(|p| policy.emigrants(source, p))?
            };
            emigrants.push(selected);
        }

        let mut report = MigrationReport {
            round,
            records: Vec::new(),
        };
        let mut staged: BTreeMap<usize, Population> = BTreeMap::new();
        for (source, selected) in emigrants.iter().enumerate() {
            if selected.is_empty() {
                continue;
            }
            for edge in self.topology.outgoing(source)? {
                if !policy.use_edge(edge.weight) {
                    continue;
                }
                let destination = edge.to;
                let population = match staged.entry(destination) {
                    Entry::Occupied(entry) => entry.into_mut(),
                    Entry::Vacant(entry) => entry.insert(self.island(destination)?.population()?),
                };
                let count = policy
                    .immigrate(destination, population, selected.clone())
                    .map_err(|e| {
                        tracing::warn!(round, source, destination, error = %e, "migration round abandoned");
                        e
                    })?;
                tracing::trace!(round, source, destination, count, "migrants delivered");
                report.records.push(MigrationRecord {
                    round,
                    source,
                    destination,
                    count,
                });
            }
        }

        for (destination, population) in staged {
            self.islands[destination].with_population_mut(|p| *p = population)?;
        }
        self.migration_rounds += 1;
        self.migration_history.extend(report.records.iter().cloned());
        tracing::debug!(round, migrants = report.total_migrants(), "migration round complete");
        Ok(report)
    }

    /// Alternate evolution and migration for `rounds` rounds
    pub fn evolve_and_migrate(
        &mut self,
        rounds: usize,
        generations: u64,
        policy: &mut dyn MigrationPolicy,
    ) -> EvoResult<Vec<MigrationReport>> {
        let mut reports = Vec::with_capacity(rounds);
        for _ in 0..rounds {
            self.evolve(generations)?;
            self.join()?;
            reports.push(self.migrate(policy)?);
        }
        Ok(reports)
    }

    /// Best champion across all islands
    pub fn champion(&self) -> EvoResult<Option<Champion>> {
        let mut best: Option<Champion> = None;
        for island in &self.islands {
            let Some(candidate) = island.champion()? else {
                continue;
            };
            let better = match &best {
                None => true,
                Some(current) => island
                    .problem()
                    .compare_fitness(&candidate.fitness, &current.fitness),
            };
            if better {
                best = Some(candidate);
            }
        }
        Ok(best)
    }

    pub fn island_statistics(&self) -> EvoResult<Vec<IslandStats>> {
        self.islands
            .iter()
            .enumerate()
            .map(|(index, island)| {
                let evolution_time = island.evolution_time()?;
                island.read_population(|p| IslandStats {
                    index,
                    evolution_time,
                    population_size: p.size(),
                    mean_fitness: p.mean_objective(0),
                    best_fitness: p.best_index().map(|i| p[i].fitness.clone()),
                    champion_fitness: p.champion().map(|c| c.fitness.clone()),
                })
            })
            .collect()
    }

    /// Join every island and capture the whole archipelago
    pub fn snapshot(&self) -> EvoResult<ArchipelagoSnapshot> {
        let islands = self
            .islands
            .iter()
            .map(Island::snapshot)
            .collect::<EvoResult<Vec<_>>>()?;
        Ok(ArchipelagoSnapshot {
            version: SNAPSHOT_VERSION,
            islands,
            topology: self.topology.clone(),
            migration_history: self.migration_history.clone(),
            migration_rounds: self.migration_rounds,
        })
    }

    /// Rebuild an archipelago whose islands all run clones of `algorithm`
    pub fn restore(
        problem: Arc<dyn Problem>,
        algorithm: &dyn Algorithm,
        snapshot: ArchipelagoSnapshot,
    ) -> EvoResult<Self> {
        if !snapshot.is_compatible() {
            return Err(SnapshotError::VersionMismatch {
                expected: SNAPSHOT_VERSION,
                found: snapshot.version,
            }
            .into());
        }
        let islands = snapshot
            .islands
            .into_iter()
            .map(|island| Island::restore(Arc::clone(&problem), algorithm, island))
            .collect::<EvoResult<Vec<_>>>()?;
        let mut archipelago = Self::new(snapshot.topology, islands)?;
        archipelago.migration_rounds = snapshot
            .migration_history
            .last()
            .map_or(0, |record| record.round + 1)
            .max(snapshot.migration_rounds);
        archipelago.migration_history = snapshot.migration_history;
        Ok(archipelago)
    }

    /// Join every island, then describe the archipelago
    pub fn human_readable(&self) -> EvoResult<String> {
        self.join()?;
        let mut out = format!("Number of islands: {}\n", self.islands.len());
        out.push_str(&self.topology.to_string());
        out.push_str(&format!("Migration rounds: {}\n", self.migration_rounds));
        for (index, island) in self.islands.iter().enumerate() {
            out.push_str(&format!("\nIsland #{index}:\n"));
            out.push_str(&island.human_readable_terse()?);
            out.push_str(&format!("Evolution time: {}\n", island.evolution_time()?));
        }
        Ok(out)
    }

    fn ensure_joined(&self) -> EvoResult<()> {
        match self.islands.iter().position(Island::is_busy) {
            Some(index) => Err(EvolutionError::Busy(format!(
                "island {index} has an evolution that has not been joined"
            ))),
            None => Ok(()),
        }
    }

    fn check_topology(&self, topology: &Topology) -> EvoResult<()> {
        if topology.num_vertices() > self.islands.len() {
            return Err(EvolutionError::InvalidArgument(format!(
                "topology has {} vertices but the archipelago has {} islands",
                topology.num_vertices(),
                self.islands.len()
            )));
        }
        topology.validate()
    }
}

impl Default for Archipelago {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Archipelago {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Archipelago")
            .field("islands", &self.islands)
            .field("topology", &self.topology)
            .field("migration_rounds", &self.migration_rounds)
            .finish()
    }
}

impl fmt::Display for Archipelago {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.human_readable() {
            Ok(text) => f.write_str(&text),
            Err(e) => write!(f, "Archipelago unavailable: {e}"),
        }
    }
}

fn check_compatible(existing: &Arc<dyn Problem>, candidate: &Arc<dyn Problem>) -> EvoResult<()> {
    if existing.dimension() != candidate.dimension()
        || existing.fitness_dimension() != candidate.fitness_dimension()
    {
        return Err(EvolutionError::InvalidArgument(format!(
            "island problem {} ({} variables, {} objectives) does not match {} ({} variables, {} objectives)",
            candidate.name(),
            candidate.dimension(),
            candidate.fitness_dimension(),
            existing.name(),
            existing.dimension(),
            existing.fitness_dimension()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::no_op::NoOp;
    use crate::archipelago::migration::{MigrantReplacement, MigrantSelection, StandardMigration};
    use crate::population::individual::Individual;
    use crate::population::population::Population;
    use crate::problem::benchmarks::Sphere;
    use std::collections::BTreeSet;

    fn sphere() -> Arc<dyn Problem> {
        Arc::new(Sphere::new(1))
    }

    /// Island whose individuals sit at the given positions
    fn island_at(values: &[f64]) -> Island {
        let problem = sphere();
        let mut population = Population::empty(Arc::clone(&problem));
        for &v in values {
            population
                .push(Individual::evaluated(problem.as_ref(), vec![v]))
                .unwrap();
        }
        Island::from_population(population, &NoOp::new())
    }

    fn best_replace_worst() -> StandardMigration {
        StandardMigration::with_seed(MigrantSelection::Best(1), MigrantReplacement::ReplaceWorst, 1)
    }

    #[test]
    fn test_new_sets_membership() {
        let archipelago = Archipelago::new(
            Topology::ring(3),
            vec![island_at(&[1.0]), island_at(&[2.0]), island_at(&[3.0])],
        )
        .unwrap();
        assert_eq!(archipelago.len(), 3);
        for (i, island) in archipelago.islands().enumerate() {
            assert!(island.belongs_to_archipelago());
            assert_eq!(island.archipelago_index(), Some(i));
        }
    }

    #[test]
    fn test_topology_larger_than_islands() {
        let result = Archipelago::new(Topology::ring(4), vec![island_at(&[1.0])]);
        assert!(matches!(result, Err(EvolutionError::InvalidArgument(_))));
    }

    #[test]
    fn test_topology_padded_with_isolated_vertices() {
        let archipelago =
            Archipelago::new(Topology::unconnected(1), vec![island_at(&[1.0]), island_at(&[2.0])])
                .unwrap();
        assert_eq!(archipelago.topology().num_vertices(), 2);
        assert!(archipelago.neighbours(1).unwrap().is_empty());
    }

    #[test]
    fn test_incompatible_island_rejected() {
        let mut archipelago = Archipelago::new(Topology::default(), vec![island_at(&[1.0])]).unwrap();
        let wide = Island::with_seed(Arc::new(Sphere::new(3)), &NoOp::new(), 2, 1).unwrap();
        assert!(matches!(
            archipelago.add_island(wide),
            Err(EvolutionError::InvalidArgument(_))
        ));
        assert_eq!(archipelago.len(), 1);
    }

    #[test]
    fn test_membership_ends_with_archipelago() {
        let archipelago = Archipelago::new(Topology::default(), vec![island_at(&[1.0])]).unwrap();
        let copy = archipelago.island(0).unwrap().try_clone().unwrap();
        assert!(copy.belongs_to_archipelago());
        drop(archipelago);
        assert!(!copy.belongs_to_archipelago());
        assert!(copy
            .human_readable()
            .unwrap()
            .contains("Belongs to archipelago: false\n"));
    }

    #[test]
    fn test_add_island_is_isolated_unless_wired() {
        let mut archipelago =
            Archipelago::new(Topology::ring(2), vec![island_at(&[1.0]), island_at(&[2.0])]).unwrap();
        let edges = archipelago.topology().num_edges();

        let index = archipelago.add_island(island_at(&[3.0])).unwrap();
        assert_eq!(index, 2);
        assert_eq!(archipelago.topology().num_vertices(), 3);
        assert_eq!(archipelago.topology().num_edges(), edges);
        assert!(archipelago.topology().incoming(2).unwrap().is_empty());

        let wired = archipelago
            .add_island_connected(island_at(&[4.0]), &[0, 2])
            .unwrap();
        assert_eq!(archipelago.neighbours(wired).unwrap(), vec![0, 2]);
        assert_eq!(archipelago.topology().incoming(wired).unwrap(), vec![0, 2]);

        assert!(archipelago
            .add_island_connected(island_at(&[5.0]), &[9])
            .is_err());
        assert_eq!(archipelago.len(), 4);
    }

    #[test]
    fn test_island_out_of_range() {
        let archipelago = Archipelago::empty();
        assert!(matches!(
            archipelago.island(0),
            Err(EvolutionError::OutOfRange { index: 0, size: 0 })
        ));
    }

    #[test]
    fn test_migration_follows_edges() {
        let mut archipelago = Archipelago::new(
            Topology::one_way_ring(3),
            vec![island_at(&[0.1, 3.0]), island_at(&[4.0, 2.0]), island_at(&[1.0, 5.0])],
        )
        .unwrap();
        let report = archipelago.migrate(&mut best_replace_worst()).unwrap();

        assert_eq!(report.total_migrants(), 3);
        assert_eq!(report.sources_of(1), BTreeSet::from([0]));
        assert_eq!(report.sources_of(0), BTreeSet::from([2]));

        // Emigrants were chosen before any insertion
        let second = archipelago.island(1).unwrap().population().unwrap();
        assert_eq!(second[0].decision, vec![0.1]);
        let third = archipelago.island(2).unwrap().population().unwrap();
        assert_eq!(third[1].decision, vec![2.0]);
        let first = archipelago.island(0).unwrap().population().unwrap();
        assert_eq!(first[1].decision, vec![1.0]);

        assert_eq!(archipelago.migration_history().len(), 3);
    }

    #[test]
    fn test_unconnected_islands_receive_nothing() {
        let mut archipelago = Archipelago::new(
            Topology::unconnected(2),
            vec![island_at(&[0.1]), island_at(&[4.0])],
        )
        .unwrap();
        let report = archipelago.migrate(&mut best_replace_worst()).unwrap();
        assert_eq!(report.total_migrants(), 0);
        let second = archipelago.island(1).unwrap().population().unwrap();
        assert_eq!(second[0].decision, vec![4.0]);
    }

    #[test]
    fn test_zero_weight_edge_unused() {
        let mut archipelago =
            Archipelago::new(Topology::unconnected(2), vec![island_at(&[0.1]), island_at(&[4.0])])
                .unwrap();
        archipelago.connect(0, 1, 0.0).unwrap();
        let report = archipelago.migrate(&mut best_replace_worst()).unwrap();
        assert!(report.records.is_empty());
    }

    #[test]
    fn test_migrate_while_busy_changes_nothing() {
        let mut archipelago = Archipelago::new(
            Topology::ring(2),
            vec![island_at(&[0.1]), island_at(&[4.0])],
        )
        .unwrap();
        archipelago.evolve(1).unwrap();
        let result = archipelago.migrate(&mut best_replace_worst());
        assert!(matches!(result, Err(EvolutionError::Busy(_))));
        assert!(archipelago.migration_history().is_empty());

        archipelago.join().unwrap();
        let second = archipelago.island(1).unwrap().population().unwrap();
        assert_eq!(second[0].decision, vec![4.0]);
    }

    /// Delivers normally until its `fail_at`-th insertion, which fails
    struct FailingDelivery {
        inner: StandardMigration,
        deliveries: usize,
        fail_at: usize,
    }

    impl MigrationPolicy for FailingDelivery {
        fn emigrants(&mut self, source: usize, population: &Population) -> Vec<Individual> {
            self.inner.emigrants(source, population)
        }

        fn immigrate(
            &mut self,
            destination: usize,
            population: &mut Population,
            immigrants: Vec<Individual>,
        ) -> EvoResult<usize> {
            self.deliveries += 1;
            if self.deliveries == self.fail_at {
                return Err(EvolutionError::InvalidArgument("delivery refused".into()));
            }
            self.inner.immigrate(destination, population, immigrants)
        }
    }

    #[test]
    fn test_failed_round_changes_nothing() {
        let mut archipelago = Archipelago::new(
            Topology::one_way_ring(3),
            vec![island_at(&[0.1, 3.0]), island_at(&[4.0, 2.0]), island_at(&[1.0, 5.0])],
        )
        .unwrap();
        let before: Vec<_> = archipelago
            .islands()
            .map(|island| island.population().unwrap().snapshot())
            .collect();

        let mut policy = FailingDelivery {
            inner: best_replace_worst(),
            deliveries: 0,
            fail_at: 2,
        };
        let result = archipelago.migrate(&mut policy);
        assert!(matches!(result, Err(EvolutionError::InvalidArgument(_))));

        for (island, expected) in archipelago.islands().zip(&before) {
            assert_eq!(&island.population().unwrap().snapshot(), expected);
        }
        assert!(archipelago.migration_history().is_empty());
        assert_eq!(archipelago.migration_rounds(), 0);

        let report = archipelago.migrate(&mut best_replace_worst()).unwrap();
        assert_eq!(report.round, 0);
        assert_eq!(report.total_migrants(), 3);
    }

    #[test]
    fn test_restore_rejects_malformed_topology() {
        let archipelago =
            Archipelago::new(Topology::ring(2), vec![island_at(&[0.1]), island_at(&[4.0])]).unwrap();
        let mut snapshot = archipelago.snapshot().unwrap();
        snapshot.topology =
            serde_json::from_str(r#"{"adjacency":[[{"to":7,"weight":1.0}],[]]}"#).unwrap();

        let result = Archipelago::restore(sphere(), &NoOp::new(), snapshot);
        assert!(matches!(result, Err(EvolutionError::InvalidArgument(_))));
    }

    #[test]
    fn test_set_topology_rejects_bad_weight() {
        let mut archipelago =
            Archipelago::new(Topology::ring(2), vec![island_at(&[0.1]), island_at(&[4.0])]).unwrap();
        let heavy: Topology =
            serde_json::from_str(r#"{"adjacency":[[{"to":1,"weight":3.0}],[]]}"#).unwrap();
        assert!(matches!(
            archipelago.set_topology(heavy),
            Err(EvolutionError::InvalidArgument(_))
        ));
        assert_eq!(archipelago.topology(), &Topology::ring(2));
    }

    #[test]
    fn test_clear_migration_history() {
        let mut archipelago =
            Archipelago::new(Topology::ring(2), vec![island_at(&[0.1]), island_at(&[4.0])]).unwrap();
        let mut policy = best_replace_worst();
        archipelago.migrate(&mut policy).unwrap();
        archipelago.migrate(&mut policy).unwrap();

        let drained = archipelago.clear_migration_history();
        assert_eq!(drained.len(), 4);
        assert!(archipelago.migration_history().is_empty());
        assert_eq!(archipelago.migration_rounds(), 2);

        let report = archipelago.migrate(&mut policy).unwrap();
        assert_eq!(report.round, 2);

        archipelago.clear_migration_history();
        let restored =
            Archipelago::restore(sphere(), &NoOp::new(), archipelago.snapshot().unwrap()).unwrap();
        assert_eq!(restored.migration_rounds(), 3);
    }

    #[test]
    fn test_disconnect_outside_topology_is_noop() {
        let mut archipelago =
            Archipelago::new(Topology::ring(2), vec![island_at(&[0.1]), island_at(&[4.0])]).unwrap();
        archipelago.disconnect(0, 9).unwrap();
        archipelago.disconnect(9, 0).unwrap();
        assert_eq!(archipelago.topology().num_edges(), 2);
    }

    #[test]
    fn test_evolve_and_migrate() {
        let mut archipelago = Archipelago::new(
            Topology::ring(3),
            vec![island_at(&[0.5]), island_at(&[1.5]), island_at(&[2.5])],
        )
        .unwrap();
        let reports = archipelago
            .evolve_and_migrate(3, 2, &mut best_replace_worst())
            .unwrap();
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[2].round, 2);
        for island in archipelago.islands() {
            assert_eq!(island.evolution_time().unwrap(), 6);
        }
    }

    #[test]
    fn test_champion_across_islands() {
        let archipelago = Archipelago::new(
            Topology::default(),
            vec![island_at(&[2.0]), island_at(&[-0.5]), island_at(&[1.0])],
        )
        .unwrap();
        let champion = archipelago.champion().unwrap().unwrap();
        assert_eq!(champion.decision, vec![-0.5]);
        assert_eq!(champion.fitness, vec![0.25]);
    }

    #[test]
    fn test_island_statistics() {
        let archipelago =
            Archipelago::new(Topology::default(), vec![island_at(&[1.0, 3.0]), island_at(&[])])
                .unwrap();
        let stats = archipelago.island_statistics().unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].population_size, 2);
        assert_eq!(stats[0].mean_fitness, Some(5.0));
        assert_eq!(stats[0].best_fitness, Some(vec![1.0]));
        assert_eq!(stats[1].mean_fitness, None);
        assert_eq!(stats[1].champion_fitness, None);
    }

    #[test]
    fn test_snapshot_restore() {
        let mut archipelago = Archipelago::new(
            Topology::ring(2),
            vec![island_at(&[0.1, 1.0]), island_at(&[2.0, 3.0])],
        )
        .unwrap();
        archipelago.migrate(&mut best_replace_worst()).unwrap();
        let snapshot = archipelago.snapshot().unwrap();
        assert!(snapshot.islands.iter().all(|i| i.belongs_to_archipelago));

        let restored = Archipelago::restore(sphere(), &NoOp::new(), snapshot.clone()).unwrap();
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.topology(), archipelago.topology());
        assert_eq!(restored.migration_history(), archipelago.migration_history());
        assert_eq!(
            restored.island(1).unwrap().population().unwrap().snapshot(),
            snapshot.islands[1].population
        );
    }

    #[test]
    fn test_human_readable() {
        let archipelago =
            Archipelago::new(Topology::ring(2), vec![island_at(&[1.0]), island_at(&[2.0])]).unwrap();
        let text = archipelago.human_readable().unwrap();
        assert!(text.starts_with("Number of islands: 2\n"));
        assert!(text.contains("Island #1:\nProblem name: Sphere"));
    }
}
