//! Simulation time model.
//!
//! # Design
//!
//! Time is whatever numeric type the model wants (`u64` ticks, `f64` days, …)
//! as long as it implements [`SimTime`].  A [`Clock`] is an iterator over time
//! values plus a fixed start time:
//!
//! ```text
//! start = 10, step = 1, steps = 3   →   11, 12, 13, <exhausted>
//! ```
//!
//! The start time itself is never yielded: it is the time at which agents and
//! the environment are initialised.  The first tick is `start + step`.
//!
//! Clocks are not restartable.  Once a [`FixedClock`] is exhausted it stays
//! exhausted; build a new one to iterate again.

use std::fmt;
use std::hash::Hash;
use std::iter::FusedIterator;
use std::ops::Add;

use crate::SimRng;

// ── SimTime ───────────────────────────────────────────────────────────────────

/// A value the simulation clock can produce.
pub trait SimTime:
    Copy + PartialOrd + Add<Output = Self> + fmt::Debug + fmt::Display + 'static
{
}

/// Integer time.  Required by schedulers that key tables by time value.
pub trait DiscreteTime: SimTime + Ord + Hash {
    /// The time `steps` unit steps after `self`, saturating at the type's max.
    fn advance(self, steps: u64) -> Self;
}

macro_rules! sim_time {
    (discrete: $($t:ty),*) => {$(
        impl SimTime for $t {}

        impl DiscreteTime for $t {
            #[inline]
            fn advance(self, steps: u64) -> Self {
                let steps = <$t>::try_from(steps).unwrap_or(<$t>::MAX);
                self.saturating_add(steps)
            }
        }
    )*};
    (continuous: $($t:ty),*) => {$(
        impl SimTime for $t {}
    )*};
}

sim_time!(discrete: u32, u64, usize, i32, i64);
sim_time!(continuous: f32, f64);

// ── Clock ─────────────────────────────────────────────────────────────────────

/// A lazy, possibly infinite, sequence of simulation times.
pub trait Clock<T: SimTime>: Iterator<Item = T> {
    /// The time agents and the environment are initialised at.  Fixed for the
    /// life of the clock.
    fn start_time(&self) -> T;
}

/// Fixed step size, fixed number of steps.
///
/// `FixedClock::new(3, 10, 1)` yields 11, 12, 13.
#[derive(Clone, Debug)]
pub struct FixedClock<T> {
    start:      T,
    current:    T,
    step_size:  T,
    num_steps:  u64,
    step_count: u64,
}

impl<T: SimTime> FixedClock<T> {
    pub fn new(num_steps: u64, start: T, step_size: T) -> Self {
        Self {
            start,
            current: start,
            step_size,
            num_steps,
            step_count: 0,
        }
    }

    /// Number of steps configured at construction.
    pub fn num_steps(&self) -> u64 {
        self.num_steps
    }

    /// Number of values still to be produced.
    pub fn remaining(&self) -> u64 {
        self.num_steps - self.step_count
    }

    pub fn is_exhausted(&self) -> bool {
        self.step_count >= self.num_steps
    }
}

impl FixedClock<u64> {
    /// `num_steps` unit ticks starting from 0: yields 1, 2, …, `num_steps`.
    pub fn ticks(num_steps: u64) -> Self {
        Self::new(num_steps, 0, 1)
    }
}

impl<T: SimTime> Iterator for FixedClock<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.is_exhausted() {
            return None;
        }
        self.step_count += 1;
        self.current = self.current + self.step_size;
        Some(self.current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining()) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl<T: SimTime> FusedIterator for FixedClock<T> {}

impl<T: SimTime> Clock<T> for FixedClock<T> {
    fn start_time(&self) -> T {
        self.start
    }
}

/// Fixed step size, never exhausts.  A run driven by this clock only ends
/// when its terminator fires.
#[derive(Clone, Debug)]
pub struct UnboundedClock<T> {
    start:     T,
    current:   T,
    step_size: T,
}

impl<T: SimTime> UnboundedClock<T> {
    pub fn new(start: T, step_size: T) -> Self {
        Self { start, current: start, step_size }
    }
}

impl<T: SimTime> Iterator for UnboundedClock<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.current = self.current + self.step_size;
        Some(self.current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<T: SimTime> Clock<T> for UnboundedClock<T> {
    fn start_time(&self) -> T {
        self.start
    }
}

/// Either clock policy, chosen at runtime from a [`SimConfig`].
#[derive(Clone, Debug)]
pub enum ConfiguredClock<T> {
    Fixed(FixedClock<T>),
    Unbounded(UnboundedClock<T>),
}

impl<T: SimTime> Iterator for ConfiguredClock<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match self {
            ConfiguredClock::Fixed(c)     => c.next(),
            ConfiguredClock::Unbounded(c) => c.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            ConfiguredClock::Fixed(c)     => c.size_hint(),
            ConfiguredClock::Unbounded(c) => c.size_hint(),
        }
    }
}

impl<T: SimTime> Clock<T> for ConfiguredClock<T> {
    fn start_time(&self) -> T {
        match self {
            ConfiguredClock::Fixed(c)     => c.start_time(),
            ConfiguredClock::Unbounded(c) => c.start_time(),
        }
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level run configuration.
///
/// Typically loaded from a TOML/JSON file by the application (enable the
/// `serde` feature) and turned into a clock and RNG for the builder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig<T> {
    /// Time at which agents and the environment are initialised.
    pub start: T,

    /// Clock increment per tick.
    pub step_size: T,

    /// Ticks to simulate.  `None` runs until the terminator fires.
    pub num_steps: Option<u64>,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Run the completion pass after agent steps (simultaneous update).
    pub two_stage: bool,
}

impl<T: SimTime> SimConfig<T> {
    /// Construct the clock described by this configuration.
    pub fn make_clock(&self) -> ConfiguredClock<T> {
        match self.num_steps {
            Some(n) => ConfiguredClock::Fixed(FixedClock::new(n, self.start, self.step_size)),
            None    => ConfiguredClock::Unbounded(UnboundedClock::new(self.start, self.step_size)),
        }
    }

    /// Root RNG for this run.  Derive per-component streams with
    /// [`SimRng::child`].
    pub fn make_rng(&self) -> SimRng {
        SimRng::new(self.seed)
    }
}

impl SimConfig<u64> {
    /// Unit ticks from 0, one-stage update.
    pub fn ticks(num_steps: u64, seed: u64) -> Self {
        Self {
            start: 0,
            step_size: 1,
            num_steps: Some(num_steps),
            seed,
            two_stage: false,
        }
    }
}
