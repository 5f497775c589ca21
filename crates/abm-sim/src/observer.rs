//! Simulation observer trait and the stock observers.

use std::io::{self, BufRead, StdinLock, Stdout, Write};
use std::thread;
use std::time::Duration;

use abm_core::{HookResult, SimTime};

/// Callbacks invoked by [`Simulation::run`][crate::Simulation::run].
///
/// `start` runs once after initialization (with the start time), `step`
/// after every tick, and `stop` once when the run ends (with the last tick's
/// time, or the start time if no tick ran).  Only `step` is required.
///
/// # Example: population printer
///
/// ```rust,ignore
/// struct PopulationPrinter;
///
/// impl<A, E> Observer<A, E, u64> for PopulationPrinter {
///     fn step(&mut self, now: u64, agents: &[A], _env: &E) -> HookResult {
///         println!("t={now}: {} agents", agents.len());
///         Ok(())
///     }
/// }
/// ```
pub trait Observer<A, E, T: SimTime> {
    fn start(&mut self, _now: T, _agents: &[A], _env: &E) -> HookResult {
        Ok(())
    }

    fn step(&mut self, now: T, agents: &[A], env: &E) -> HookResult;

    fn stop(&mut self, _now: T, _agents: &[A], _env: &E) -> HookResult {
        Ok(())
    }
}

impl<A, E, T: SimTime, O: Observer<A, E, T> + ?Sized> Observer<A, E, T> for Box<O> {
    fn start(&mut self, now: T, agents: &[A], env: &E) -> HookResult {
        (**self).start(now, agents, env)
    }

    fn step(&mut self, now: T, agents: &[A], env: &E) -> HookResult {
        (**self).step(now, agents, env)
    }

    fn stop(&mut self, now: T, agents: &[A], env: &E) -> HookResult {
        (**self).stop(now, agents, env)
    }
}

impl<A, E, T: SimTime, O: Observer<A, E, T> + ?Sized> Observer<A, E, T> for &mut O {
    fn start(&mut self, now: T, agents: &[A], env: &E) -> HookResult {
        (**self).start(now, agents, env)
    }

    fn step(&mut self, now: T, agents: &[A], env: &E) -> HookResult {
        (**self).step(now, agents, env)
    }

    fn stop(&mut self, now: T, agents: &[A], env: &E) -> HookResult {
        (**self).stop(now, agents, env)
    }
}

/// An [`Observer`] that does nothing.  Use when you need to call `run` but
/// don't want callbacks.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl<A, E, T: SimTime> Observer<A, E, T> for NoopObserver {
    fn step(&mut self, _now: T, _agents: &[A], _env: &E) -> HookResult {
        Ok(())
    }
}

// ── ChainedObserver ───────────────────────────────────────────────────────────

/// Fans every callback out to a list of observers, in insertion order.
///
/// The first failing observer aborts the callback; later observers in the
/// chain are not called for that event.
pub struct ChainedObserver<'a, A, E, T> {
    observers: Vec<Box<dyn Observer<A, E, T> + 'a>>,
}

impl<'a, A, E, T: SimTime> ChainedObserver<'a, A, E, T> {
    pub fn new() -> Self {
        Self { observers: Vec::new() }
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, observer: impl Observer<A, E, T> + 'a) -> Self {
        self.push(observer);
        self
    }

    pub fn push(&mut self, observer: impl Observer<A, E, T> + 'a) {
        self.observers.push(Box::new(observer));
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl<A, E, T: SimTime> Default for ChainedObserver<'_, A, E, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, E, T: SimTime> Observer<A, E, T> for ChainedObserver<'_, A, E, T> {
    fn start(&mut self, now: T, agents: &[A], env: &E) -> HookResult {
        self.observers.iter_mut().try_for_each(|o| o.start(now, agents, env))
    }

    fn step(&mut self, now: T, agents: &[A], env: &E) -> HookResult {
        self.observers.iter_mut().try_for_each(|o| o.step(now, agents, env))
    }

    fn stop(&mut self, now: T, agents: &[A], env: &E) -> HookResult {
        self.observers.iter_mut().try_for_each(|o| o.stop(now, agents, env))
    }
}

// ── Pausing observers ─────────────────────────────────────────────────────────

/// Sleeps for a fixed delay after every tick, and optionally after
/// initialization and at the end of the run.
#[derive(Clone, Copy, Debug)]
pub struct PauseObserver {
    delay:    Duration,
    at_start: bool,
    at_stop:  bool,
    pauses:   usize,
}

impl PauseObserver {
    pub fn new(delay: Duration) -> Self {
        Self { delay, at_start: false, at_stop: false, pauses: 0 }
    }

    pub fn at_start(mut self, enabled: bool) -> Self {
        self.at_start = enabled;
        self
    }

    pub fn at_stop(mut self, enabled: bool) -> Self {
        self.at_stop = enabled;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Number of times this observer has slept so far.
    pub fn pauses(&self) -> usize {
        self.pauses
    }

    fn pause(&mut self) {
        thread::sleep(self.delay);
        self.pauses += 1;
    }
}

impl<A, E, T: SimTime> Observer<A, E, T> for PauseObserver {
    fn start(&mut self, _now: T, _agents: &[A], _env: &E) -> HookResult {
        if self.at_start {
            self.pause();
        }
        Ok(())
    }

    fn step(&mut self, _now: T, _agents: &[A], _env: &E) -> HookResult {
        self.pause();
        Ok(())
    }

    fn stop(&mut self, _now: T, _agents: &[A], _env: &E) -> HookResult {
        if self.at_stop {
            self.pause();
        }
        Ok(())
    }
}

/// Sleeps once, when the run ends (keeps a live display on screen).
#[derive(Clone, Copy, Debug)]
pub struct PauseAtEndObserver {
    delay:  Duration,
    paused: bool,
}

impl PauseAtEndObserver {
    pub fn new(delay: Duration) -> Self {
        Self { delay, paused: false }
    }

    /// Whether the end-of-run pause has happened.
    pub fn paused(&self) -> bool {
        self.paused
    }
}

impl<A, E, T: SimTime> Observer<A, E, T> for PauseAtEndObserver {
    fn step(&mut self, _now: T, _agents: &[A], _env: &E) -> HookResult {
        Ok(())
    }

    fn stop(&mut self, _now: T, _agents: &[A], _env: &E) -> HookResult {
        thread::sleep(self.delay);
        self.paused = true;
        Ok(())
    }
}

/// Prints a prompt and waits for a line of input after every tick (and
/// optionally after initialization and at the end of the run).
///
/// Reader and writer are injected; [`KeyPauseObserver::stdio`] uses the
/// terminal.  End of input is treated as "continue".
pub struct KeyPauseObserver<R, W> {
    input:    R,
    output:   W,
    message:  String,
    at_start: bool,
    at_stop:  bool,
}

impl KeyPauseObserver<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> KeyPauseObserver<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            message:  "Press enter to continue...".to_owned(),
            at_start: false,
            at_stop:  false,
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn at_start(mut self, enabled: bool) -> Self {
        self.at_start = enabled;
        self
    }

    pub fn at_stop(mut self, enabled: bool) -> Self {
        self.at_stop = enabled;
        self
    }

    /// Recover the reader and writer.
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    fn pause(&mut self) -> HookResult {
        write!(self.output, "{}", self.message)?;
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(())
    }
}

impl<A, E, T: SimTime, R: BufRead, W: Write> Observer<A, E, T> for KeyPauseObserver<R, W> {
    fn start(&mut self, _now: T, _agents: &[A], _env: &E) -> HookResult {
        if self.at_start { self.pause() } else { Ok(()) }
    }

    fn step(&mut self, _now: T, _agents: &[A], _env: &E) -> HookResult {
        self.pause()
    }

    fn stop(&mut self, _now: T, _agents: &[A], _env: &E) -> HookResult {
        if self.at_stop { self.pause() } else { Ok(()) }
    }
}
