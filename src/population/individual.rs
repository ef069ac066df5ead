//! Individual and champion value types
//!
//! An individual is one candidate solution: where it is (decision vector),
//! how it last moved (velocity vector), how good it is (fitness vector) and
//! the best fitness it has ever reached.

use serde::{Deserialize, Serialize};

use crate::problem::traits::{format_vector, Problem};

/// A candidate solution
///
/// Individuals have value semantics: populations replace them wholesale
/// instead of mutating them in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    /// Position in the decision space
    pub decision: Vec<f64>,
    /// Last displacement; empty if the algorithm does not use velocities
    pub velocity: Vec<f64>,
    /// Objective values at `decision`
    pub fitness: Vec<f64>,
    /// Best objective values this individual has reached
    pub best_fitness: Vec<f64>,
}

impl Individual {
    /// Create an individual whose best fitness is its current fitness
    pub fn new(decision: Vec<f64>, velocity: Vec<f64>, fitness: Vec<f64>) -> Self {
        let best_fitness = fitness.clone();
        Self {
            decision,
            velocity,
            fitness,
            best_fitness,
        }
    }

    /// Evaluate `decision` on the problem; velocity starts at zero
    pub fn evaluated(problem: &dyn Problem, decision: Vec<f64>) -> Self {
        let fitness = problem.objective(&decision);
        let velocity = vec![0.0; decision.len()];
        Self::new(decision, velocity, fitness)
    }

    /// Override the best fitness
    pub fn with_best_fitness(mut self, best_fitness: Vec<f64>) -> Self {
        self.best_fitness = best_fitness;
        self
    }

    /// Check if this individual is better than another under the problem ordering
    pub fn is_better_than(&self, other: &Self, problem: &dyn Problem) -> bool {
        problem.compare_fitness(&self.fitness, &other.fitness)
    }

    /// Multi-line rendering used by island reports
    pub(crate) fn render(&self) -> String {
        format!(
            "\tDecision vector:\t{}\n\tVelocity vector:\t{}\n\tFitness vector:\t\t{}\n\tBest fitness vector:\t{}\n",
            format_vector(&self.decision),
            format_vector(&self.velocity),
            format_vector(&self.fitness),
            format_vector(&self.best_fitness),
        )
    }
}

/// Snapshot of the best individual a population has observed
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Champion {
    pub decision: Vec<f64>,
    pub fitness: Vec<f64>,
}

impl Champion {
    pub(crate) fn render(&self) -> String {
        format!(
            "\tDecision vector:\t{}\n\tFitness vector:\t\t{}\n",
            format_vector(&self.decision),
            format_vector(&self.fitness),
        )
    }
}

impl From<&Individual> for Champion {
    fn from(individual: &Individual) -> Self {
        Self {
            decision: individual.decision.clone(),
            fitness: individual.fitness.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::benchmarks::Sphere;

    #[test]
    fn test_individual_new_copies_best_fitness() {
        let individual = Individual::new(vec![1.0, 2.0], vec![], vec![5.0]);
        assert_eq!(individual.best_fitness, vec![5.0]);
        assert!(individual.velocity.is_empty());
    }

    #[test]
    fn test_individual_evaluated() {
        let sphere = Sphere::new(2);
        let individual = Individual::evaluated(&sphere, vec![1.0, 2.0]);
        assert_eq!(individual.fitness, vec![5.0]);
        assert_eq!(individual.velocity, vec![0.0, 0.0]);
    }

    #[test]
    fn test_individual_is_better_than() {
        let sphere = Sphere::new(1);
        let near = Individual::evaluated(&sphere, vec![0.5]);
        let far = Individual::evaluated(&sphere, vec![3.0]);
        assert!(near.is_better_than(&far, &sphere));
        assert!(!far.is_better_than(&near, &sphere));
    }

    #[test]
    fn test_individual_render_labels() {
        let individual = Individual::new(vec![1.0], vec![0.0], vec![1.0]);
        let text = individual.render();
        assert!(text.contains("\tDecision vector:\t[1]\n"));
        assert!(text.contains("\tFitness vector:\t\t[1]\n"));
        assert!(text.contains("\tBest fitness vector:\t[1]\n"));
    }

    #[test]
    fn test_champion_from_individual() {
        let individual = Individual::new(vec![1.0, 1.0], vec![0.0, 0.0], vec![2.0]);
        let champion = Champion::from(&individual);
        assert_eq!(champion.decision, vec![1.0, 1.0]);
        assert_eq!(champion.fitness, vec![2.0]);
    }
}
