//! The `Scheduler` trait and the stateless / RNG-holding policies.

use abm_core::{SimRng, SimTime};

use crate::error::check_probability;
use crate::{ScheduleError, ScheduleResult};

/// Decides which agents update at a given time.
///
/// Returns indices into `agents`.  Implementations may return them in any
/// order; the driver steps them in the order returned.
pub trait Scheduler<A, E, T: SimTime> {
    fn schedule(&mut self, now: T, agents: &[A], env: &E) -> ScheduleResult<Vec<usize>>;

    /// Population size this scheduler was built for, if it is fixed.  The
    /// simulation builder rejects a population of any other size.
    fn expected_population(&self) -> Option<usize> {
        None
    }
}

impl<A, E, T: SimTime, S: Scheduler<A, E, T> + ?Sized> Scheduler<A, E, T> for Box<S> {
    fn schedule(&mut self, now: T, agents: &[A], env: &E) -> ScheduleResult<Vec<usize>> {
        (**self).schedule(now, agents, env)
    }

    fn expected_population(&self) -> Option<usize> {
        (**self).expected_population()
    }
}

// ── In-order ──────────────────────────────────────────────────────────────────

/// Every agent, in population order.  Deterministic.
#[doc(alias = "BasicScheduler")]
#[derive(Clone, Copy, Debug, Default)]
pub struct InOrderScheduler;

impl<A, E, T: SimTime> Scheduler<A, E, T> for InOrderScheduler {
    fn schedule(&mut self, _now: T, agents: &[A], _env: &E) -> ScheduleResult<Vec<usize>> {
        Ok((0..agents.len()).collect())
    }
}

// ── Random order ──────────────────────────────────────────────────────────────

/// Every agent exactly once, in a fresh uniform random order each tick.
#[derive(Clone, Debug)]
pub struct RandomOrderScheduler {
    rng: SimRng,
}

impl RandomOrderScheduler {
    pub fn new(rng: SimRng) -> Self {
        Self { rng }
    }
}

impl<A, E, T: SimTime> Scheduler<A, E, T> for RandomOrderScheduler {
    fn schedule(&mut self, _now: T, agents: &[A], _env: &E) -> ScheduleResult<Vec<usize>> {
        Ok(self.rng.permutation(agents.len()))
    }
}

// ── Random sample ─────────────────────────────────────────────────────────────

/// `size` distinct agents drawn uniformly without replacement each tick.
///
/// Fails with [`ScheduleError::SampleExceedsPopulation`] on a tick where the
/// population is smaller than `size`.
#[derive(Clone, Debug)]
pub struct RandomSampleScheduler {
    size: usize,
    rng:  SimRng,
}

impl RandomSampleScheduler {
    pub fn new(size: usize, rng: SimRng) -> Self {
        Self { size, rng }
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

impl<A, E, T: SimTime> Scheduler<A, E, T> for RandomSampleScheduler {
    fn schedule(&mut self, _now: T, agents: &[A], _env: &E) -> ScheduleResult<Vec<usize>> {
        if self.size > agents.len() {
            return Err(ScheduleError::SampleExceedsPopulation {
                size:       self.size,
                population: agents.len(),
            });
        }
        Ok(self.rng.sample_indices(agents.len(), self.size))
    }
}

// ── Bernoulli ─────────────────────────────────────────────────────────────────

/// Each agent independently updates with probability `p` (a Bernoulli
/// process per agent).
///
/// The discrete counterpart of a Poisson process: waits between an agent's
/// updates are geometric with mean `1 / p`.  An empty selection is valid.
#[derive(Clone, Debug)]
pub struct BernoulliScheduler {
    p:   f64,
    rng: SimRng,
}

impl BernoulliScheduler {
    /// Fails with [`ScheduleError::InvalidProbability`] unless `0 <= p <= 1`.
    pub fn new(p: f64, rng: SimRng) -> ScheduleResult<Self> {
        Ok(Self { p: check_probability(p)?, rng })
    }

    pub fn probability(&self) -> f64 {
        self.p
    }
}

impl<A, E, T: SimTime> Scheduler<A, E, T> for BernoulliScheduler {
    fn schedule(&mut self, _now: T, agents: &[A], _env: &E) -> ScheduleResult<Vec<usize>> {
        let p = self.p;
        let rng = &mut self.rng;
        Ok((0..agents.len()).filter(|_| rng.gen_bool(p)).collect())
    }
}
