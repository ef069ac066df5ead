//! Differential evolution (DE/rand/1/bin)

use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};

use crate::algorithms::traits::Algorithm;
use crate::error::{EvoResult, EvolutionError};
use crate::population::population::Population;

/// Classic differential evolution with binomial crossover
///
/// Trial vectors for a generation are built from the population as it was at
/// the start of the generation, then each trial replaces its target if it is
/// not worse.
#[derive(Clone, Debug)]
pub struct DifferentialEvolution {
    /// Differential weight
    pub weight: f64,
    /// Crossover probability
    pub crossover_rate: f64,
    seed: u64,
    rng: StdRng,
}

impl DifferentialEvolution {
    pub fn new(weight: f64, crossover_rate: f64) -> EvoResult<Self> {
        Self::with_seed(weight, crossover_rate, rand::random())
    }

    pub fn with_seed(weight: f64, crossover_rate: f64, seed: u64) -> EvoResult<Self> {
        if !(weight > 0.0 && weight <= 2.0) {
            return Err(EvolutionError::InvalidArgument(format!(
                "differential weight must be in (0, 2], got {weight}"
            )));
        }
        if !(0.0..=1.0).contains(&crossover_rate) {
            return Err(EvolutionError::InvalidArgument(format!(
                "crossover rate must be in [0, 1], got {crossover_rate}"
            )));
        }
        Ok(Self {
            weight,
            crossover_rate,
            seed,
            rng: StdRng::seed_from_u64(seed),
        })
    }
}

impl Default for DifferentialEvolution {
    fn default() -> Self {
        Self {
            weight: 0.8,
            crossover_rate: 0.9,
            seed: 0,
            rng: StdRng::seed_from_u64(0),
        }
    }
}

impl Algorithm for DifferentialEvolution {
    fn name(&self) -> &str {
        "Differential evolution"
    }

    fn evolve(&mut self, population: &mut Population) -> EvoResult<()> {
        let size = population.size();
        if size < 4 {
            return Err(EvolutionError::AlgorithmFailure(format!(
                "differential evolution needs at least 4 individuals, population has {size}"
            )));
        }
        let problem = std::sync::Arc::clone(population.problem());
        let bounds = problem.bounds();
        let n = problem.dimension();

        let mut trials = Vec::with_capacity(size);
        for target in 0..size {
            let picks: Vec<usize> = sample(&mut self.rng, size - 1, 3)
                .into_iter()
                .map(|i| if i >= target { i + 1 } else { i })
                .collect();
            let (a, b, c) = (
                &population[picks[0]].decision,
                &population[picks[1]].decision,
                &population[picks[2]].decision,
            );
            let forced = self.rng.gen_range(0..n.max(1));
            let mut trial = population[target].decision.clone();
            for j in 0..n {
                if j == forced || self.rng.gen::<f64>() < self.crossover_rate {
                    trial[j] = a[j] + self.weight * (b[j] - c[j]);
                }
            }
            bounds.clamp_vec(&mut trial);
            trials.push(trial);
        }

        for (target, trial) in trials.into_iter().enumerate() {
            let fitness = problem.objective(&trial);
            if !problem.compare_fitness(&population[target].fitness, &fitness) {
                population.update_evaluated(target, trial, fitness)?;
            }
        }
        Ok(())
    }

    fn box_clone(&self) -> Box<dyn Algorithm> {
        Box::new(self.clone())
    }

    fn description(&self) -> String {
        format!(
            "Algorithm name: {}\n\tF:\t{}\n\tCR:\t{}\n\tseed:\t{}",
            self.name(),
            self.weight,
            self.crossover_rate,
            self.seed,
        )
    }
}
