//! Early-stop predicates consulted once per tick.

use abm_core::SimTime;

/// Decides, after each tick's observer call, whether the run should stop.
///
/// Any `FnMut(T, &[A], &E) -> bool` is a terminator.
pub trait Terminator<A, E, T: SimTime> {
    fn test(&mut self, now: T, agents: &[A], env: &E) -> bool;
}

impl<A, E, T: SimTime, F> Terminator<A, E, T> for F
where
    F: FnMut(T, &[A], &E) -> bool,
{
    fn test(&mut self, now: T, agents: &[A], env: &E) -> bool {
        self(now, agents, env)
    }
}

/// The default: only clock exhaustion ends the run.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverTerminate;

impl<A, E, T: SimTime> Terminator<A, E, T> for NeverTerminate {
    fn test(&mut self, _now: T, _agents: &[A], _env: &E) -> bool {
        false
    }
}

/// Stops once the clock reaches `end` (for unbounded clocks).
#[derive(Clone, Copy, Debug)]
pub struct StopAtTime<T>(pub T);

impl<A, E, T: SimTime> Terminator<A, E, T> for StopAtTime<T> {
    fn test(&mut self, now: T, _agents: &[A], _env: &E) -> bool {
        now >= self.0
    }
}
