//! Population type
//!
//! A population is the ordered set of individuals an island's algorithm
//! works on, together with the champion observed so far. It performs no
//! locking of its own; the owning island guarantees a single writer.

use std::sync::Arc;

use rand::RngCore;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::checkpoint::PopulationSnapshot;
use crate::error::{EvoResult, EvolutionError};
use crate::population::individual::{Champion, Individual};
use crate::problem::traits::Problem;

/// A population of individuals bound to a problem
#[derive(Clone, Debug)]
pub struct Population {
    /// Problem shared with every copy of this population
    problem: Arc<dyn Problem>,
    /// The individuals in this population
    individuals: Vec<Individual>,
    /// Best individual observed so far
    champion: Option<Champion>,
}

impl Population {
    /// Create an empty population
    pub fn empty(problem: Arc<dyn Problem>) -> Self {
        Self {
            problem,
            individuals: Vec::new(),
            champion: None,
        }
    }

    /// Create a population of `size` individuals drawn from the problem domain
    pub fn new(problem: Arc<dyn Problem>, size: usize, rng: &mut dyn RngCore) -> Self {
        let decisions: Vec<Vec<f64>> = (0..size).map(|_| problem.random_decision(rng)).collect();
        let individuals = evaluate_decisions(problem.as_ref(), decisions);

        let mut population = Self {
            problem,
            individuals: Vec::with_capacity(size),
            champion: None,
        };
        for individual in individuals {
            population.track_champion(&individual);
            population.individuals.push(individual);
        }
        population
    }

    /// Rebuild a population from a snapshot, validating it against `problem`
    pub fn restore(problem: Arc<dyn Problem>, snapshot: PopulationSnapshot) -> EvoResult<Self> {
        let mut population = Self::empty(problem);
        for individual in snapshot.individuals {
            population.push(individual)?;
        }
        if let Some(champion) = snapshot.champion {
            population.check_dimensions(&champion.decision, &champion.fitness)?;
            let keep_current = population.champion.as_ref().map_or(false, |current| {
                population
                    .problem
                    .compare_fitness(&current.fitness, &champion.fitness)
            });
            if !keep_current {
                population.champion = Some(champion);
            }
        }
        Ok(population)
    }

    /// The problem this population is evaluated on
    pub fn problem(&self) -> &Arc<dyn Problem> {
        &self.problem
    }

    /// Get the population size
    pub fn size(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Get an individual by index
    pub fn get_individual(&self, index: usize) -> EvoResult<&Individual> {
        self.individuals.get(index).ok_or(EvolutionError::OutOfRange {
            index,
            size: self.individuals.len(),
        })
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn iter(&self) -> impl Iterator<Item = &Individual> {
        self.individuals.iter()
    }

    /// Best individual observed so far, `None` until one has been inserted
    pub fn champion(&self) -> Option<&Champion> {
        self.champion.as_ref()
    }

    /// Append an individual
    pub fn push(&mut self, individual: Individual) -> EvoResult<()> {
        self.check_individual(&individual)?;
        self.track_champion(&individual);
        self.individuals.push(individual);
        Ok(())
    }

    /// Replace the individual at `index`, returning the evicted one
    pub fn set_individual(&mut self, index: usize, individual: Individual) -> EvoResult<Individual> {
        self.check_index(index)?;
        self.check_individual(&individual)?;
        self.track_champion(&individual);
        Ok(std::mem::replace(&mut self.individuals[index], individual))
    }

    /// Remove the individual at `index`
    ///
    /// The champion is a record of the best individual ever observed, so it
    /// survives the eviction of the individual it was taken from.
    pub fn erase(&mut self, index: usize) -> EvoResult<Individual> {
        self.check_index(index)?;
        Ok(self.individuals.remove(index))
    }

    /// Move the individual at `index` to `decision` and re-evaluate it
    ///
    /// The velocity becomes the displacement, and the best fitness is
    /// updated when the new position improves on it.
    pub fn update_decision(&mut self, index: usize, decision: Vec<f64>) -> EvoResult<()> {
        self.check_index(index)?;
        let fitness = self.problem.objective(&decision);
        self.update_evaluated(index, decision, fitness)
    }

    /// Same as [`Population::update_decision`] with a fitness the caller
    /// already computed for `decision`
    pub fn update_evaluated(
        &mut self,
        index: usize,
        decision: Vec<f64>,
        fitness: Vec<f64>,
    ) -> EvoResult<()> {
        self.check_index(index)?;
        self.check_dimensions(&decision, &fitness)?;

        let current = &self.individuals[index];
        let velocity = decision
            .iter()
            .zip(&current.decision)
            .map(|(new, old)| new - old)
            .collect();
        let best_fitness = if self
            .problem
            .compare_fitness(&fitness, &current.best_fitness)
        {
            fitness.clone()
        } else {
            current.best_fitness.clone()
        };

        let updated = Individual {
            decision,
            velocity,
            fitness,
            best_fitness,
        };
        self.track_champion(&updated);
        self.individuals[index] = updated;
        Ok(())
    }

    /// Indices ordered best first
    ///
    /// Individuals are ranked by how many others are strictly better than
    /// them under the problem ordering; ties keep their insertion order.
    pub fn ranked_indices(&self) -> Vec<usize> {
        let problem = self.problem.as_ref();
        let dominated_by: Vec<usize> = self
            .individuals
            .iter()
            .map(|candidate| {
                self.individuals
                    .iter()
                    .filter(|other| problem.compare_fitness(&other.fitness, &candidate.fitness))
                    .count()
            })
            .collect();

        let mut indices: Vec<usize> = (0..self.individuals.len()).collect();
        indices.sort_by_key(|&i| dominated_by[i]);
        indices
    }

    /// Index of the best individual currently in the population
    pub fn best_index(&self) -> Option<usize> {
        self.ranked_indices().first().copied()
    }

    /// Index of the worst individual currently in the population
    pub fn worst_index(&self) -> Option<usize> {
        self.ranked_indices().last().copied()
    }

    /// Mean of one objective across the population
    pub fn mean_objective(&self, objective: usize) -> Option<f64> {
        let values: Vec<f64> = self
            .individuals
            .iter()
            .filter_map(|i| i.fitness.get(objective).copied())
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        }
    }

    /// Serializable copy of the individuals and champion
    pub fn snapshot(&self) -> PopulationSnapshot {
        PopulationSnapshot {
            individuals: self.individuals.clone(),
            champion: self.champion.clone(),
        }
    }

    fn track_champion(&mut self, candidate: &Individual) {
        let improved = match &self.champion {
            None => true,
            Some(champion) => self
                .problem
                .compare_fitness(&candidate.fitness, &champion.fitness),
        };
        if improved {
            self.champion = Some(Champion::from(candidate));
        }
    }

    fn check_index(&self, index: usize) -> EvoResult<()> {
        if index < self.individuals.len() {
            Ok(())
        } else {
            Err(EvolutionError::OutOfRange {
                index,
                size: self.individuals.len(),
            })
        }
    }

    fn check_individual(&self, individual: &Individual) -> EvoResult<()> {
        self.check_dimensions(&individual.decision, &individual.fitness)?;
        if !individual.velocity.is_empty() && individual.velocity.len() != individual.decision.len()
        {
            return Err(EvolutionError::InvalidArgument(format!(
                "velocity has dimension {}, expected {}",
                individual.velocity.len(),
                individual.decision.len()
            )));
        }
        if individual.best_fitness.len() != individual.fitness.len() {
            return Err(EvolutionError::InvalidArgument(format!(
                "best fitness has dimension {}, expected {}",
                individual.best_fitness.len(),
                individual.fitness.len()
            )));
        }
        Ok(())
    }

    fn check_dimensions(&self, decision: &[f64], fitness: &[f64]) -> EvoResult<()> {
        let dimension = self.problem.dimension();
        if decision.len() != dimension {
            return Err(EvolutionError::InvalidArgument(format!(
                "decision vector has dimension {}, problem {} expects {}",
                decision.len(),
                self.problem.name(),
                dimension
            )));
        }
        let fitness_dimension = self.problem.fitness_dimension();
        if fitness.len() != fitness_dimension {
            return Err(EvolutionError::InvalidArgument(format!(
                "fitness vector has dimension {}, problem {} expects {}",
                fitness.len(),
                self.problem.name(),
                fitness_dimension
            )));
        }
        Ok(())
    }
}

#[cfg(feature = "parallel")]
fn evaluate_decisions(problem: &dyn Problem, decisions: Vec<Vec<f64>>) -> Vec<Individual> {
    decisions
        .into_par_iter()
        .map(|decision| Individual::evaluated(problem, decision))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn evaluate_decisions(problem: &dyn Problem, decisions: Vec<Vec<f64>>) -> Vec<Individual> {
    decisions
        .into_iter()
        .map(|decision| Individual::evaluated(problem, decision))
        .collect()
}

impl std::ops::Index<usize> for Population {
    type Output = Individual;

    fn index(&self, index: usize) -> &Self::Output {
        &self.individuals[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::benchmarks::{Schaffer, Sphere};
    use rand::SeedableRng;

    fn sphere() -> Arc<dyn Problem> {
        Arc::new(Sphere::new(2))
    }

    fn create_test_population() -> Population {
        let problem = sphere();
        let mut population = Population::empty(Arc::clone(&problem));
        for x in [3.0, 1.0, 2.0, 4.0] {
            population
                .push(Individual::evaluated(problem.as_ref(), vec![x, 0.0]))
                .unwrap();
        }
        population
    }

    #[test]
    fn test_population_new() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let population = Population::new(sphere(), 10, &mut rng);

        assert_eq!(population.size(), 10);
        assert!(population.champion().is_some());
        for individual in population.iter() {
            assert!(population.problem().verify_decision(&individual.decision));
            assert_eq!(individual.fitness.len(), 1);
            assert_eq!(individual.fitness, individual.best_fitness);
        }
    }

    #[test]
    fn test_empty_population_has_no_champion() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let population = Population::new(sphere(), 0, &mut rng);
        assert!(population.is_empty());
        assert!(population.champion().is_none());
    }

    #[test]
    fn test_champion_is_best_of_initial_population() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        let population = Population::new(sphere(), 25, &mut rng);
        let champion = population.champion().unwrap();
        for individual in population.iter() {
            assert!(champion.fitness[0] <= individual.fitness[0]);
        }
    }

    #[test]
    fn test_get_individual_out_of_range() {
        let population = create_test_population();
        assert!(population.get_individual(3).is_ok());
        assert!(matches!(
            population.get_individual(4),
            Err(EvolutionError::OutOfRange { index: 4, size: 4 })
        ));
    }

    #[test]
    fn test_push_rejects_wrong_dimension() {
        let mut population = create_test_population();
        let bad = Individual::new(vec![1.0], vec![], vec![1.0]);
        assert!(matches!(
            population.push(bad),
            Err(EvolutionError::InvalidArgument(_))
        ));
        assert_eq!(population.size(), 4);
    }

    #[test]
    fn test_set_individual_updates_champion() {
        let mut population = create_test_population();
        assert_eq!(population.champion().unwrap().fitness, vec![1.0]);

        let better = Individual::new(vec![0.5, 0.0], vec![0.0, 0.0], vec![0.25]);
        let evicted = population.set_individual(3, better).unwrap();
        assert_eq!(evicted.decision, vec![4.0, 0.0]);
        assert_eq!(population.champion().unwrap().fitness, vec![0.25]);
    }

    #[test]
    fn test_champion_survives_erase() {
        let mut population = create_test_population();
        let best = population.best_index().unwrap();
        population.erase(best).unwrap();
        assert_eq!(population.size(), 3);
        assert_eq!(population.champion().unwrap().decision, vec![1.0, 0.0]);
    }

    #[test]
    fn test_update_decision_tracks_velocity_and_best() {
        let mut population = create_test_population();
        population.update_decision(0, vec![0.0, 0.0]).unwrap();

        let moved = population.get_individual(0).unwrap();
        assert_eq!(moved.velocity, vec![-3.0, 0.0]);
        assert_eq!(moved.fitness, vec![0.0]);
        assert_eq!(moved.best_fitness, vec![0.0]);
        assert_eq!(population.champion().unwrap().fitness, vec![0.0]);

        population.update_decision(0, vec![2.0, 0.0]).unwrap();
        let moved = population.get_individual(0).unwrap();
        assert_eq!(moved.fitness, vec![4.0]);
        assert_eq!(moved.best_fitness, vec![0.0]);
    }

    #[test]
    fn test_ranked_indices() {
        let population = create_test_population();
        assert_eq!(population.ranked_indices(), vec![1, 2, 0, 3]);
        assert_eq!(population.best_index(), Some(1));
        assert_eq!(population.worst_index(), Some(3));
    }

    #[test]
    fn test_mean_objective() {
        let population = create_test_population();
        // (9 + 1 + 4 + 16) / 4
        assert_eq!(population.mean_objective(0), Some(7.5));
        assert_eq!(population.mean_objective(1), None);
    }

    #[test]
    fn test_multi_objective_champion_not_dominated() {
        let problem: Arc<dyn Problem> = Arc::new(Schaffer::new());
        let mut population = Population::empty(Arc::clone(&problem));
        for x in [5.0, 1.0, 0.5, -3.0, 1.5] {
            population
                .push(Individual::evaluated(problem.as_ref(), vec![x]))
                .unwrap();
        }
        let champion = population.champion().unwrap();
        for individual in population.iter() {
            assert!(!problem.compare_fitness(&individual.fitness, &champion.fitness));
        }
    }

    #[test]
    fn test_snapshot_restore() {
        let population = create_test_population();
        let snapshot = population.snapshot();
        let restored = Population::restore(sphere(), snapshot).unwrap();
        assert_eq!(restored.individuals(), population.individuals());
        assert_eq!(restored.champion(), population.champion());
    }

    #[test]
    fn test_restore_rejects_other_problem() {
        let snapshot = create_test_population().snapshot();
        let result = Population::restore(Arc::new(Sphere::new(3)), snapshot);
        assert!(result.is_err());
    }
}
