//! Migration policies and migration bookkeeping
//!
//! A migration round asks the policy for the emigrants of every source
//! island first, then hands copies of them to the policy once per outgoing
//! edge to insert into the destination population.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::EvoResult;
use crate::population::individual::Individual;
use crate::population::population::Population;

/// Decides which individuals leave an island and how arrivals are inserted
pub trait MigrationPolicy: Send {
    /// Individuals copied out of the island at index `source`
    fn emigrants(&mut self, source: usize, population: &Population) -> Vec<Individual>;

    /// Insert `immigrants` into the population of island `destination`,
    /// returning how many were actually inserted
    fn immigrate(
        &mut self,
        destination: usize,
        population: &mut Population,
        immigrants: Vec<Individual>,
    ) -> EvoResult<usize>;

    /// Whether an edge of the given weight is used in this round
    fn use_edge(&mut self, weight: f64) -> bool {
        weight > 0.0
    }
}

/// Which individuals emigrate
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MigrantSelection {
    /// Best k individuals
    Best(usize),
    /// Random k individuals
    Random(usize),
}

impl Default for MigrantSelection {
    fn default() -> Self {
        Self::Best(1)
    }
}

/// How immigrants enter the destination population
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum MigrantReplacement {
    /// Grow the population
    Append,
    /// Overwrite the worst individuals
    #[default]
    ReplaceWorst,
    /// Overwrite random individuals
    ReplaceRandom,
    /// Overwrite the worst individuals only where the immigrant is better
    ReplaceIfBetter,
}

/// Selection plus replacement, with its own random stream
///
/// Edge weights are used as migration probabilities.
#[derive(Clone, Debug)]
pub struct StandardMigration {
    pub selection: MigrantSelection,
    pub replacement: MigrantReplacement,
    rng: StdRng,
}

impl StandardMigration {
    pub fn new(selection: MigrantSelection, replacement: MigrantReplacement) -> Self {
        Self {
            selection,
            replacement,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(selection: MigrantSelection, replacement: MigrantReplacement, seed: u64) -> Self {
        Self {
            selection,
            replacement,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl MigrationPolicy for StandardMigration {
    fn emigrants(&mut self, _source: usize, population: &Population) -> Vec<Individual> {
        match self.selection {
            MigrantSelection::Best(k) => population
                .ranked_indices()
                .into_iter()
                .take(k)
                .map(|i| population[i].clone())
                .collect(),
            MigrantSelection::Random(k) => population
                .individuals()
                .choose_multiple(&mut self.rng, k)
                .cloned()
                .collect(),
        }
    }

    fn immigrate(
        &mut self,
        _destination: usize,
        population: &mut Population,
        immigrants: Vec<Individual>,
    ) -> EvoResult<usize> {
        let mut inserted = 0;
        match self.replacement {
            MigrantReplacement::Append => {
                for immigrant in immigrants {
                    population.push(immigrant)?;
                    inserted += 1;
                }
            }
            MigrantReplacement::ReplaceWorst => {
                let worst_first: Vec<usize> = population.ranked_indices().into_iter().rev().collect();
                for (slot, immigrant) in worst_first.into_iter().zip(immigrants) {
                    population.set_individual(slot, immigrant)?;
                    inserted += 1;
                }
            }
            MigrantReplacement::ReplaceRandom => {
                if population.is_empty() {
                    return Ok(0);
                }
                for immigrant in immigrants {
                    let slot = self.rng.gen_range(0..population.size());
                    population.set_individual(slot, immigrant)?;
                    inserted += 1;
                }
            }
            MigrantReplacement::ReplaceIfBetter => {
                let worst_first: Vec<usize> = population.ranked_indices().into_iter().rev().collect();
                for (slot, immigrant) in worst_first.into_iter().zip(immigrants) {
                    let better =
                        immigrant.is_better_than(&population[slot], population.problem().as_ref());
                    if better {
                        population.set_individual(slot, immigrant)?;
                        inserted += 1;
                    }
                }
            }
        }
        Ok(inserted)
    }

    fn use_edge(&mut self, weight: f64) -> bool {
        weight >= 1.0 || (weight > 0.0 && self.rng.gen::<f64>() < weight)
    }
}

/// One delivery of migrants along an edge
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationRecord {
    /// Migration round, starting at 0
    pub round: u64,
    pub source: usize,
    pub destination: usize,
    /// Individuals inserted into the destination
    pub count: usize,
}

/// Outcome of one migration round
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MigrationReport {
    pub round: u64,
    pub records: Vec<MigrationRecord>,
}

impl MigrationReport {
    /// Total individuals inserted during the round
    pub fn total_migrants(&self) -> usize {
        self.records.iter().map(|r| r.count).sum()
    }

    /// Islands that delivered migrants to `destination`
    pub fn sources_of(&self, destination: usize) -> BTreeSet<usize> {
        self.records
            .iter()
            .filter(|r| r.destination == destination && r.count > 0)
            .map(|r| r.source)
            .collect()
    }

    /// Individuals inserted into `destination`
    pub fn received_by(&self, destination: usize) -> usize {
        self.records
            .iter()
            .filter(|r| r.destination == destination)
            .map(|r| r.count)
            .sum()
    }
}
