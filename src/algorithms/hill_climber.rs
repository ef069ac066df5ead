//! Gaussian hill climber
//!
//! Every individual proposes a Gaussian step around its decision vector and
//! moves there only if the step improves its fitness.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::algorithms::traits::Algorithm;
use crate::error::{EvoResult, EvolutionError};
use crate::population::population::Population;

/// Greedy local search with Gaussian perturbations
#[derive(Clone, Debug)]
pub struct HillClimber {
    /// Step standard deviation, relative to each variable's range
    pub sigma: f64,
    /// Per-variable perturbation probability (default: 1/n)
    pub mutation_probability: Option<f64>,
    seed: u64,
    rng: StdRng,
}

impl HillClimber {
    /// Create a hill climber with the given relative step size
    pub fn new(sigma: f64) -> EvoResult<Self> {
        Self::with_seed(sigma, rand::random())
    }

    /// Create a hill climber with a reproducible random stream
    pub fn with_seed(sigma: f64, seed: u64) -> EvoResult<Self> {
        if !(sigma > 0.0 && sigma.is_finite()) {
            return Err(EvolutionError::InvalidArgument(format!(
                "sigma must be positive and finite, got {sigma}"
            )));
        }
        Ok(Self {
            sigma,
            mutation_probability: None,
            seed,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Set a fixed per-variable perturbation probability
    pub fn with_probability(mut self, probability: f64) -> EvoResult<Self> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(EvolutionError::InvalidArgument(format!(
                "probability must be in [0, 1], got {probability}"
            )));
        }
        self.mutation_probability = Some(probability);
        Ok(self)
    }
}

impl Algorithm for HillClimber {
    fn name(&self) -> &str {
        "Gaussian hill climber"
    }

    fn evolve(&mut self, population: &mut Population) -> EvoResult<()> {
        let problem = std::sync::Arc::clone(population.problem());
        let bounds = problem.bounds();
        let n = problem.dimension();
        if n == 0 {
            return Ok(());
        }
        let prob = self.mutation_probability.unwrap_or(1.0 / n as f64);
        let standard = Normal::new(0.0, 1.0)
            .map_err(|e| EvolutionError::AlgorithmFailure(e.to_string()))?;

        for index in 0..population.size() {
            let current = population.get_individual(index)?;
            let mut candidate = current.decision.clone();
            let mut moved = false;
            for (value, bound) in candidate.iter_mut().zip(&bounds.bounds) {
                if self.rng.gen::<f64>() < prob {
                    *value += standard.sample(&mut self.rng) * self.sigma * bound.range();
                    moved = true;
                }
            }
            if !moved {
                continue;
            }
            bounds.clamp_vec(&mut candidate);

            let fitness = problem.objective(&candidate);
            if problem.compare_fitness(&fitness, &current.fitness) {
                population.update_evaluated(index, candidate, fitness)?;
            }
        }
        Ok(())
    }

    fn box_clone(&self) -> Box<dyn Algorithm> {
        Box::new(self.clone())
    }

    fn description(&self) -> String {
        format!(
            "Algorithm name: {}\n\tsigma:\t{}\n\tmutation probability:\t{}\n\tseed:\t{}",
            self.name(),
            self.sigma,
            self.mutation_probability
                .map_or_else(|| "1/n".to_string(), |p| p.to_string()),
            self.seed,
        )
    }
}
