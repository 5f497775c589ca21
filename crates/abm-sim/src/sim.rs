//! The `Simulation` struct and its tick loop.

use std::collections::HashSet;

use abm_agent::{split_at_agent, Agent, Environment, StepContext};
use abm_core::{Clock, IdGenerator, SimTime};
use abm_schedule::Scheduler;

use crate::{HookPhase, Observer, SimError, SimResult, Terminator};

// ── Run bookkeeping ───────────────────────────────────────────────────────────

/// Lifecycle of a [`Simulation`].
///
/// `build()` leaves the simulation `Initialized`; `run` moves it through
/// `Running` and `Terminated` to `Stopped` (after `Observer::stop`).  A run
/// aborted by an error stays `Running`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Initialized,
    Running,
    Terminated,
    Stopped,
}

/// Why the tick loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    ClockExhausted,
    Terminated,
}

/// Returned by [`Simulation::run`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunSummary<T> {
    /// Ticks executed.
    pub ticks: u64,
    /// Time passed to `Observer::stop`: the last tick's time, or the start
    /// time if the clock yielded nothing.
    pub final_time: T,
    pub reason: StopReason,
}

/// Which agent hook a pass over the selected agents calls.
#[derive(Clone, Copy)]
enum Pass {
    Step,
    Complete,
}

// ── Simulation ────────────────────────────────────────────────────────────────

/// The simulation driver.
///
/// Owns the population, the environment, the clock, the scheduler and the
/// terminator, and runs the fixed per-tick hook order documented at the
/// crate root.  Create via [`SimBuilder`][crate::SimBuilder].
pub struct Simulation<A, E, C, S, T> {
    pub(crate) agents:     Vec<A>,
    pub(crate) env:        E,
    pub(crate) clock:      C,
    pub(crate) scheduler:  S,
    pub(crate) terminator: Box<dyn Terminator<A, E, T>>,
    pub(crate) two_stage:  bool,
    pub(crate) ids:        IdGenerator,
    pub(crate) start:      T,
    pub(crate) phase:      Phase,
}

impl<A, E, C, S, T> Simulation<A, E, C, S, T>
where
    A: Agent<E, T>,
    E: Environment<A, T>,
    C: Clock<T>,
    S: Scheduler<A, E, T>,
    T: SimTime,
{
    // ── Accessors ─────────────────────────────────────────────────────────

    /// Current population, in population-index order.
    pub fn agents(&self) -> &[A] {
        &self.agents
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_two_stage(&self) -> bool {
        self.two_stage
    }

    /// Time agents and environment were initialised at.
    pub fn start_time(&self) -> T {
        self.start
    }

    /// Take the final population and environment out of the simulation.
    pub fn into_parts(self) -> (Vec<A>, E) {
        (self.agents, self.env)
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Drive the clock to exhaustion or until the terminator fires.
    ///
    /// Calls `observer.start` first, `observer.step` after every tick and
    /// `observer.stop` once at the end.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    ///
    /// A simulation runs at most once: a second call fails with
    /// [`SimError::AlreadyRun`].  Any hook failure aborts the run
    /// immediately; `observer.stop` is not called in that case.
    pub fn run<O: Observer<A, E, T>>(&mut self, observer: &mut O) -> SimResult<RunSummary<T>> {
        if self.phase != Phase::Initialized {
            return Err(SimError::AlreadyRun);
        }
        self.phase = Phase::Running;

        tracing::info!(
            agents = self.agents.len(),
            two_stage = self.two_stage,
            start = %self.start,
            "simulation starting"
        );

        observer
            .start(self.start, &self.agents, &self.env)
            .map_err(SimError::hook(HookPhase::ObserverStart, self.start))?;

        let mut ticks = 0u64;
        let mut final_time = self.start;
        let mut reason = StopReason::ClockExhausted;

        while let Some(now) = self.clock.next() {
            self.process_tick(now)?;
            ticks += 1;
            final_time = now;

            observer
                .step(now, &self.agents, &self.env)
                .map_err(SimError::hook(HookPhase::ObserverStep, now))?;

            if self.terminator.test(now, &self.agents, &self.env) {
                reason = StopReason::Terminated;
                break;
            }
        }
        self.phase = Phase::Terminated;

        observer
            .stop(final_time, &self.agents, &self.env)
            .map_err(SimError::hook(HookPhase::ObserverStop, final_time))?;
        self.phase = Phase::Stopped;

        tracing::info!(
            ticks,
            final_time = %final_time,
            agents = self.agents.len(),
            reason = ?reason,
            "simulation stopped"
        );

        Ok(RunSummary { ticks, final_time, reason })
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick(&mut self, now: T) -> SimResult<()> {
        // ── Environment pre-step ──────────────────────────────────────────
        self.env
            .step(now, &self.agents)
            .map_err(SimError::hook(HookPhase::EnvironmentStep, now))?;

        // ── Select participants ───────────────────────────────────────────
        let selected = self
            .scheduler
            .schedule(now, &self.agents, &self.env)
            .map_err(|source| SimError::Schedule { time: now.to_string(), source })?;
        let population = self.agents.len();
        if let Some(&index) = selected.iter().find(|&&i| i >= population) {
            return Err(SimError::IndexOutOfRange { index, population, time: now.to_string() });
        }

        // ── Agent passes ──────────────────────────────────────────────────
        //
        // The completion pass walks the cached selection, never a fresh
        // schedule, so exactly the agents that stepped get completed.
        let mut spawned = Vec::new();
        self.agent_pass(now, &selected, Pass::Step, &mut spawned)?;
        if self.two_stage {
            self.agent_pass(now, &selected, Pass::Complete, &mut spawned)?;
        }

        // ── Population update ─────────────────────────────────────────────
        self.update_population(now, spawned)?;

        // ── Environment post-step ─────────────────────────────────────────
        self.env
            .complete(now, &self.agents)
            .map_err(SimError::hook(HookPhase::EnvironmentComplete, now))?;

        tracing::debug!(
            time = %now,
            selected = selected.len(),
            population = self.agents.len(),
            "tick complete"
        );
        Ok(())
    }

    fn agent_pass(
        &mut self,
        now:      T,
        selected: &[usize],
        pass:     Pass,
        spawned:  &mut Vec<A>,
    ) -> SimResult<()> {
        let population = self.agents.len();
        for &index in selected {
            let (agent, others) = split_at_agent(&mut self.agents, index).ok_or_else(|| {
                SimError::IndexOutOfRange { index, population, time: now.to_string() }
            })?;
            let mut ctx = StepContext::new(now, &mut self.env, others, &mut self.ids, spawned);
            match pass {
                Pass::Step => agent
                    .step(&mut ctx)
                    .map_err(SimError::hook(HookPhase::AgentStep, now))?,
                Pass::Complete => agent
                    .complete(&mut ctx)
                    .map_err(SimError::hook(HookPhase::AgentComplete, now))?,
            }
        }
        Ok(())
    }

    /// Initialise and append this tick's children, then reap the dead.
    ///
    /// A child whose id is already held by a live agent (or by an earlier
    /// child of the same tick) fails the tick with `DuplicateAgentId`.
    fn update_population(&mut self, now: T, spawned: Vec<A>) -> SimResult<()> {
        let born = spawned.len();
        if born > 0 {
            let mut live: HashSet<_> = self.agents.iter().map(|a| a.id()).collect();
            if let Some(dup) = spawned.iter().map(|a| a.id()).find(|&id| !live.insert(id)) {
                return Err(SimError::DuplicateAgentId(dup));
            }
        }
        for mut child in spawned {
            child
                .init(now, &self.env)
                .map_err(SimError::hook(HookPhase::SpawnInit, now))?;
            self.agents.push(child);
        }

        let before = self.agents.len();
        self.agents.retain(|a| a.is_alive());
        let died = before - self.agents.len();

        if born > 0 || died > 0 {
            tracing::debug!(time = %now, born, died, "population changed");
        }
        Ok(())
    }
}
