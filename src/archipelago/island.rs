//! Asynchronously evolving islands
//!
//! An island owns a population and a private copy of an algorithm. Calling
//! [`Island::evolve`] hands both to a background thread and returns at once;
//! [`Island::join`] waits for that thread. The thread holds the island's state
//! mutex for the whole evolution, and every read of the population, the
//! algorithm or the evolution counters goes through a completed join, so a
//! torn read cannot be observed.
//!
//! State machine: `Idle --evolve--> Evolving --join--> Idle`. Calling
//! `evolve` again before `join` fails with [`EvolutionError::Busy`], as does
//! any read made while an evolution is unjoined.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::algorithms::traits::Algorithm;
use crate::archipelago::archipelago::ArchipelagoId;
use crate::checkpoint::{IslandSnapshot, SNAPSHOT_VERSION};
use crate::error::{EvoResult, EvolutionError, SnapshotError};
use crate::population::individual::Champion;
use crate::population::population::Population;
use crate::problem::traits::Problem;

/// Everything an evolution thread mutates
struct IslandState {
    population: Population,
    algorithm: Box<dyn Algorithm>,
    /// Generations evolved so far
    evolution_time: u64,
    /// Wall-clock time spent inside evolutions
    evolution_duration: Duration,
}

/// Back-link from an island to the archipelago that owns it
///
/// Holds a weak reference only: a dropped archipelago invalidates the link
/// instead of being kept alive by it.
#[derive(Clone, Debug)]
pub(crate) struct Membership {
    archipelago: Weak<ArchipelagoId>,
    index: usize,
}

impl Membership {
    fn is_alive(&self) -> bool {
        self.archipelago.strong_count() > 0
    }
}

type EvolutionHandle = JoinHandle<EvoResult<()>>;

/// An autonomous unit evolving one population with one algorithm
pub struct Island {
    problem: Arc<dyn Problem>,
    state: Arc<Mutex<IslandState>>,
    pending: Mutex<Option<EvolutionHandle>>,
    membership: Option<Membership>,
}

impl Island {
    /// Create an island with `population_size` random individuals
    ///
    /// The algorithm is cloned, so the island owns an independent instance.
    /// A negative size is rejected with [`EvolutionError::InvalidArgument`].
    pub fn new(
        problem: Arc<dyn Problem>,
        algorithm: &dyn Algorithm,
        population_size: i64,
    ) -> EvoResult<Self> {
        let mut rng = StdRng::from_entropy();
        Self::build(problem, algorithm, population_size, &mut rng)
    }

    /// Same as [`Island::new`] with a reproducible initial population
    pub fn with_seed(
        problem: Arc<dyn Problem>,
        algorithm: &dyn Algorithm,
        population_size: i64,
        seed: u64,
    ) -> EvoResult<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::build(problem, algorithm, population_size, &mut rng)
    }

    /// Create an island around an existing population
    pub fn from_population(population: Population, algorithm: &dyn Algorithm) -> Self {
        Self::assemble(population, algorithm.box_clone(), 0, Duration::ZERO, None)
    }

    /// Rebuild an island from a snapshot
    ///
    /// Snapshots record the algorithm only by description, so the caller
    /// supplies the algorithm to continue with. The problem must match the
    /// one the snapshot was taken on.
    pub fn restore(
        problem: Arc<dyn Problem>,
        algorithm: &dyn Algorithm,
        snapshot: IslandSnapshot,
    ) -> EvoResult<Self> {
        if !snapshot.is_compatible() {
            return Err(SnapshotError::VersionMismatch {
                expected: SNAPSHOT_VERSION,
                found: snapshot.version,
            }
            .into());
        }
        if snapshot.problem != problem.name() {
            return Err(SnapshotError::Corrupted(format!(
                "snapshot was taken on problem {}, not {}",
                snapshot.problem,
                problem.name()
            ))
            .into());
        }
        let population = Population::restore(problem, snapshot.population)?;
        Ok(Self::assemble(
            population,
            algorithm.box_clone(),
            snapshot.evolution_time,
            Duration::from_secs_f64(snapshot.evolution_duration_ms.max(0.0) / 1000.0),
            None,
        ))
    }

    fn build(
        problem: Arc<dyn Problem>,
        algorithm: &dyn Algorithm,
        population_size: i64,
        rng: &mut StdRng,
    ) -> EvoResult<Self> {
        let size = usize::try_from(population_size).map_err(|_| {
            EvolutionError::InvalidArgument(format!(
                "population size must be non-negative, got {population_size}"
            ))
        })?;
        let population = Population::new(problem, size, rng);
        Ok(Self::from_population(population, algorithm))
    }

    fn assemble(
        population: Population,
        algorithm: Box<dyn Algorithm>,
        evolution_time: u64,
        evolution_duration: Duration,
        membership: Option<Membership>,
    ) -> Self {
        Self {
            problem: Arc::clone(population.problem()),
            state: Arc::new(Mutex::new(IslandState {
                population,
                algorithm,
                evolution_time,
                evolution_duration,
            })),
            pending: Mutex::new(None),
            membership,
        }
    }

    /// Start evolving for `generations` iterations on a background thread
    ///
    /// Returns immediately. Fails with [`EvolutionError::Busy`] if a previous
    /// evolution has not been joined yet.
    pub fn evolve(&mut self, generations: u64) -> EvoResult<()> {
        let mut pending = lock(&self.pending);
        if pending.is_some() {
            return Err(EvolutionError::Busy(
                "island has an evolution that has not been joined".to_string(),
            ));
        }

        let state = Arc::clone(&self.state);
        let index = self.archipelago_index();
        let handle = thread::Builder::new()
            .name("island-evolution".to_string())
            .spawn(move || run_evolution(&state, generations, index))
            .map_err(|e| {
                EvolutionError::AlgorithmFailure(format!("cannot spawn evolution thread: {e}"))
            })?;
        *pending = Some(handle);

        tracing::debug!(island = ?index, generations, "island evolution started");
        Ok(())
    }

    /// Block until the in-flight evolution, if any, has completed
    ///
    /// Idempotent: without an unjoined evolution it returns `Ok(())` at once.
    /// A failure of the joined evolution, including a panic inside the
    /// algorithm, is returned here exactly once.
    pub fn join(&self) -> EvoResult<()> {
        let mut pending = lock(&self.pending);
        let Some(handle) = pending.take() else {
            return Ok(());
        };

        let result = match handle.join() {
            Ok(result) => result,
            Err(payload) => Err(EvolutionError::AlgorithmFailure(format!(
                "algorithm panicked: {}",
                panic_message(payload.as_ref())
            ))),
        };
        if let Err(e) = &result {
            tracing::warn!(island = ?self.archipelago_index(), error = %e, "island evolution failed");
        } else {
            tracing::trace!(island = ?self.archipelago_index(), "island joined");
        }
        result
    }

    /// Whether an evolution has been started and not joined yet
    pub fn is_busy(&self) -> bool {
        lock(&self.pending).is_some()
    }

    /// The problem this island optimises
    pub fn problem(&self) -> &Arc<dyn Problem> {
        &self.problem
    }

    /// Whether the island belongs to an archipelago that is still alive
    pub fn belongs_to_archipelago(&self) -> bool {
        self.membership.as_ref().map_or(false, Membership::is_alive)
    }

    /// Index inside the owning archipelago, if it is still alive
    pub fn archipelago_index(&self) -> Option<usize> {
        self.membership
            .as_ref()
            .filter(|m| m.is_alive())
            .map(|m| m.index)
    }

    pub(crate) fn attach(&mut self, archipelago: &Arc<ArchipelagoId>, index: usize) {
        self.membership = Some(Membership {
            archipelago: Arc::downgrade(archipelago),
            index,
        });
    }

    /// Lock the state of a joined island
    fn joined_state(&self) -> EvoResult<MutexGuard<'_, IslandState>> {
        if self.is_busy() {
            return Err(EvolutionError::Busy(
                "island must be joined before its state is read".to_string(),
            ));
        }
        Ok(lock(&self.state))
    }

    /// Copy of the population
    pub fn population(&self) -> EvoResult<Population> {
        Ok(self.joined_state()?.population.clone())
    }

    /// Inspect the population without copying it
    pub fn read_population<R>(&self, f: impl FnOnce(&Population) -> R) -> EvoResult<R> {
        Ok(f(&self.joined_state()?.population))
    }

    /// Mutate the population of a joined island
    pub fn with_population_mut<R>(
        &mut self,
        f: impl FnOnce(&mut Population) -> R,
    ) -> EvoResult<R> {
        Ok(f(&mut self.joined_state()?.population))
    }

    pub fn population_size(&self) -> EvoResult<usize> {
        self.read_population(Population::size)
    }

    pub fn champion(&self) -> EvoResult<Option<Champion>> {
        self.read_population(|p| p.champion().cloned())
    }

    /// Generations evolved so far
    pub fn evolution_time(&self) -> EvoResult<u64> {
        Ok(self.joined_state()?.evolution_time)
    }

    /// Wall-clock time spent evolving
    pub fn evolution_duration(&self) -> EvoResult<Duration> {
        Ok(self.joined_state()?.evolution_duration)
    }

    pub fn algorithm_description(&self) -> EvoResult<String> {
        Ok(self.joined_state()?.algorithm.description())
    }

    /// Replace the algorithm with a clone of `algorithm`
    pub fn set_algorithm(&mut self, algorithm: &dyn Algorithm) -> EvoResult<()> {
        self.joined_state()?.algorithm = algorithm.box_clone();
        Ok(())
    }

    /// Deep copy: joins this island, then copies population, algorithm,
    /// archipelago link and evolution counters
    pub fn try_clone(&self) -> EvoResult<Self> {
        self.join()?;
        let state = lock(&self.state);
        Ok(Self::assemble(
            state.population.clone(),
            state.algorithm.box_clone(),
            state.evolution_time,
            state.evolution_duration,
            self.membership.clone(),
        ))
    }

    /// Overwrite this island with a deep copy of `other`
    ///
    /// Both islands are joined first. The problem is taken from `other`.
    pub fn assign_from(&mut self, other: &Island) -> EvoResult<()> {
        if std::ptr::eq(self, other) {
            return Ok(());
        }
        self.join()?;
        other.join()?;

        let source = lock(&other.state);
        let mut target = lock(&self.state);
        target.population = source.population.clone();
        target.algorithm = source.algorithm.box_clone();
        target.evolution_time = source.evolution_time;
        target.evolution_duration = source.evolution_duration;
        drop(target);

        self.problem = Arc::clone(&other.problem);
        self.membership = other.membership.clone();
        Ok(())
    }

    /// Problem and algorithm descriptions, after a join
    pub fn human_readable_terse(&self) -> EvoResult<String> {
        self.join()?;
        let state = lock(&self.state);
        Ok(render_terse(&self.problem, &state))
    }

    /// Full report, after a join
    ///
    /// Adds archipelago membership, evolution time, every individual and the
    /// champion to [`Island::human_readable_terse`].
    pub fn human_readable(&self) -> EvoResult<String> {
        self.join()?;
        let state = lock(&self.state);

        let mut out = render_terse(&self.problem, &state);
        out.push_str(&format!(
            "Belongs to archipelago: {}\n",
            self.belongs_to_archipelago()
        ));
        out.push_str(&format!("Evolution time: {}\n\n", state.evolution_time));

        if state.population.is_empty() {
            out.push_str("No individuals.\n");
        } else {
            out.push_str("List of individuals:\n");
            for (i, individual) in state.population.iter().enumerate() {
                out.push_str(&format!("#{i}:\n"));
                out.push_str(&individual.render());
            }
        }

        match state.population.champion() {
            Some(champion) => {
                out.push_str("Champion:\n");
                out.push_str(&champion.render());
            }
            None => out.push_str("No champion yet.\n"),
        }
        Ok(out)
    }

    /// Serializable state, after a join
    pub fn snapshot(&self) -> EvoResult<IslandSnapshot> {
        self.join()?;
        let state = lock(&self.state);
        Ok(IslandSnapshot {
            version: SNAPSHOT_VERSION,
            problem: self.problem.name().to_string(),
            algorithm: state.algorithm.description(),
            belongs_to_archipelago: self.belongs_to_archipelago(),
            evolution_time: state.evolution_time,
            evolution_duration_ms: state.evolution_duration.as_secs_f64() * 1000.0,
            population: state.population.snapshot(),
        })
    }
}

impl Drop for Island {
    fn drop(&mut self) {
        if let Err(e) = self.join() {
            tracing::warn!(error = %e, "island dropped after a failed evolution");
        }
    }
}

impl fmt::Debug for Island {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Island")
            .field("problem", &self.problem.name())
            .field("busy", &self.is_busy())
            .field("archipelago_index", &self.archipelago_index())
            .finish()
    }
}

impl fmt::Display for Island {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.human_readable() {
            Ok(text) => f.write_str(&text),
            Err(e) => write!(f, "Island unavailable: {e}"),
        }
    }
}

fn render_terse(problem: &Arc<dyn Problem>, state: &IslandState) -> String {
    format!(
        "{}\n{}\n",
        problem.description(),
        state.algorithm.description()
    )
}

/// Body of an evolution thread
fn run_evolution(
    state: &Mutex<IslandState>,
    generations: u64,
    island: Option<usize>,
) -> EvoResult<()> {
    let mut guard = lock(state);
    let state = &mut *guard;
    let started = Instant::now();

    let mut result = Ok(());
    for _ in 0..generations {
        if let Err(e) = state.algorithm.evolve(&mut state.population) {
            result = Err(match e {
                EvolutionError::AlgorithmFailure(_) => e,
                other => EvolutionError::AlgorithmFailure(other.to_string()),
            });
            break;
        }
        state.evolution_time += 1;
    }
    let elapsed = started.elapsed();
    state.evolution_duration += elapsed;

    tracing::debug!(
        island = ?island,
        evolution_time = state.evolution_time,
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        ok = result.is_ok(),
        "island evolution finished"
    );
    result
}

/// Lock a mutex, recovering the data if an algorithm panicked while holding it
///
/// The panic itself is reported by the next join.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
