//! The `Environment` trait: shared state updated around the agent passes.

use abm_core::{HookResult, SimTime};

/// The single shared environment of a simulation.
///
/// Owned by the driver.  Agents read and write it through
/// [`StepContext::env`][crate::StepContext::env]; the environment itself gets
/// a read-only view of the population before and after the agent passes.
///
/// Models that need an auxiliary structure (an occupancy grid, an adjacency
/// list) embed it in their environment type.
pub trait Environment<A, T: SimTime> {
    /// Public environment state vector, read by observers.
    fn state(&self) -> &[f32] {
        &[]
    }

    /// Called once with the clock's start time, before any agent `init`.
    fn init(&mut self, _now: T) -> HookResult {
        Ok(())
    }

    /// Called at the start of every tick, before the scheduler runs.
    fn step(&mut self, now: T, agents: &[A]) -> HookResult;

    /// Called at the end of every tick, after all agent updates.
    fn complete(&mut self, _now: T, _agents: &[A]) -> HookResult {
        Ok(())
    }
}

/// An environment with no state and no behavior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NullEnvironment;

impl<A, T: SimTime> Environment<A, T> for NullEnvironment {
    fn step(&mut self, _now: T, _agents: &[A]) -> HookResult {
        Ok(())
    }
}
