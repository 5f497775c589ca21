//! `PrecomputedBernoulliScheduler` — Bernoulli activations drawn up front.
//!
//! # Why this exists
//!
//! A [`BernoulliScheduler`][crate::BernoulliScheduler] flips one coin per
//! agent per tick: O(N) work every tick even when `p` is tiny.
//!
//! This scheduler inverts the problem.  For a fixed population and a fixed
//! horizon `[start, stop)`, it draws each agent's geometric waiting times once
//! at construction and sums them into activation times:
//!
//! ```text
//! t = start
//! loop { t += Geometric(p) (support 1, 2, …);  if t >= stop break;  table[t].push(agent) }
//! ```
//!
//! Each tick is then a single map lookup.  Memory is O(N · horizon · p).
//!
//! # Past the horizon
//!
//! Querying a time after `stop` is not an error: a warning is logged and the
//! selection is empty, so the run can continue with nobody updating.

use std::collections::BTreeMap;

use abm_core::{DiscreteTime, SimRng};
use rand_distr::{Distribution, Geometric};

use crate::error::check_probability;
use crate::{ScheduleError, ScheduleResult, Scheduler};

/// Time-keyed table of precomputed activations.
#[derive(Clone, Debug)]
pub struct PrecomputedBernoulliScheduler<T> {
    p:          f64,
    num_agents: usize,
    start:      T,
    stop:       T,
    table:      BTreeMap<T, Vec<usize>>,
    /// Cached total activation count for O(1) `len()`.
    total:      usize,
}

impl<T: DiscreteTime> PrecomputedBernoulliScheduler<T> {
    /// Draw the full schedule for `num_agents` agents over `(start, stop)`.
    ///
    /// Fails with [`ScheduleError::InvalidProbability`] unless `0 <= p <= 1`,
    /// and with [`ScheduleError::InvalidHorizon`] if `stop < start`.
    pub fn new(
        p:          f64,
        rng:        &mut SimRng,
        num_agents: usize,
        start:      T,
        stop:       T,
    ) -> ScheduleResult<Self> {
        let p = check_probability(p)?;
        if stop < start {
            return Err(ScheduleError::InvalidHorizon {
                start: start.to_string(),
                stop:  stop.to_string(),
            });
        }

        let mut table: BTreeMap<T, Vec<usize>> = BTreeMap::new();
        let mut total = 0;

        if p > 0.0 {
            let waits = Geometric::new(p).map_err(|_| ScheduleError::InvalidProbability(p))?;
            for agent in 0..num_agents {
                let mut t = start;
                loop {
                    // rand_distr counts failures before the first success;
                    // the wait is the trial count, so at least one tick.
                    let wait = waits.sample(rng.inner()).saturating_add(1);
                    t = t.advance(wait);
                    if t >= stop {
                        break;
                    }
                    table.entry(t).or_default().push(agent);
                    total += 1;
                }
            }
        }

        Ok(Self { p, num_agents, start, stop, table, total })
    }

    pub fn probability(&self) -> f64 {
        self.p
    }

    /// `(start, stop)`: activations fall strictly after `start` and strictly
    /// before `stop`.
    pub fn horizon(&self) -> (T, T) {
        (self.start, self.stop)
    }

    /// Agents activated at exactly `now` (ascending).  Empty if none.
    pub fn activations(&self, now: T) -> &[usize] {
        self.table.get(&now).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every time with at least one activation, ascending.
    pub fn times(&self) -> Vec<T> {
        self.table.keys().copied().collect()
    }

    /// Total number of (time, agent) activations.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

impl<A, E, T: DiscreteTime> Scheduler<A, E, T> for PrecomputedBernoulliScheduler<T> {
    fn schedule(&mut self, now: T, agents: &[A], _env: &E) -> ScheduleResult<Vec<usize>> {
        if agents.len() != self.num_agents {
            return Err(ScheduleError::PopulationMismatch {
                expected: self.num_agents,
                got:      agents.len(),
            });
        }
        match self.table.get(&now) {
            Some(selected) => Ok(selected.clone()),
            None => {
                if now > self.stop {
                    tracing::warn!(
                        time = %now,
                        horizon = %self.stop,
                        "simulation is continuing past the end of the precomputed schedule"
                    );
                }
                Ok(Vec::new())
            }
        }
    }

    fn expected_population(&self) -> Option<usize> {
        Some(self.num_agents)
    }
}
