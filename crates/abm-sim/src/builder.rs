//! Fluent builder for constructing a [`Simulation`].

use std::collections::HashSet;

use abm_agent::{Agent, Environment};
use abm_core::{Clock, ConfiguredClock, IdGenerator, SimConfig, SimTime};
use abm_schedule::Scheduler;

use crate::sim::Phase;
use crate::{HookPhase, NeverTerminate, SimError, SimResult, Simulation, Terminator};

/// Fluent builder for [`Simulation<A, E, C, S, T>`].
///
/// # Required inputs
///
/// - the initial population (`Vec<A>`, ids unique)
/// - the environment `E`
/// - a [`Clock`] (e.g. [`abm_core::FixedClock`])
/// - a [`Scheduler`] (e.g. [`abm_schedule::InOrderScheduler`])
///
/// # Optional inputs (have defaults)
///
/// | Method                 | Default                                     |
/// |------------------------|---------------------------------------------|
/// | `.terminator(t)`       | [`NeverTerminate`]                          |
/// | `.terminate_when(f)`   | (closure form of `.terminator`)             |
/// | `.two_stage(b)`        | `false` (one-stage update)                  |
/// | `.ids(g)`              | Next id after the largest initial id        |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(agents, env, FixedClock::ticks(100), InOrderScheduler)
///     .two_stage(true)
///     .terminate_when(|_now, agents: &[MyAgent], _env: &MyEnv| agents.is_empty())
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<A, E, C, S, T> {
    agents:     Vec<A>,
    env:        E,
    clock:      C,
    scheduler:  S,
    terminator: Option<Box<dyn Terminator<A, E, T>>>,
    two_stage:  bool,
    ids:        Option<IdGenerator>,
}

impl<A, E, S, T> SimBuilder<A, E, ConfiguredClock<T>, S, T>
where
    A: Agent<E, T>,
    E: Environment<A, T>,
    S: Scheduler<A, E, T>,
    T: SimTime,
{
    /// Builder whose clock and update mode come from `config`.
    pub fn from_config(config: &SimConfig<T>, agents: Vec<A>, env: E, scheduler: S) -> Self {
        SimBuilder::new(agents, env, config.make_clock(), scheduler).two_stage(config.two_stage)
    }
}

impl<A, E, C, S, T> SimBuilder<A, E, C, S, T>
where
    A: Agent<E, T>,
    E: Environment<A, T>,
    C: Clock<T>,
    S: Scheduler<A, E, T>,
    T: SimTime,
{
    /// Create a builder with all required inputs.
    pub fn new(agents: Vec<A>, env: E, clock: C, scheduler: S) -> Self {
        Self {
            agents,
            env,
            clock,
            scheduler,
            terminator: None,
            two_stage:  false,
            ids:        None,
        }
    }

    /// Early-stop predicate, tested once per tick after the observer.
    pub fn terminator(mut self, terminator: impl Terminator<A, E, T> + 'static) -> Self {
        self.terminator = Some(Box::new(terminator));
        self
    }

    /// Closure form of [`terminator`](Self::terminator).
    pub fn terminate_when<F>(self, f: F) -> Self
    where
        F: FnMut(T, &[A], &E) -> bool + 'static,
    {
        self.terminator(f)
    }

    /// Run the completion pass after every agent step pass.
    pub fn two_stage(mut self, enabled: bool) -> Self {
        self.two_stage = enabled;
        self
    }

    /// Id factory lent to agents that spawn children.  If it would hand out
    /// an id at or below the largest initial id, `build()` moves it past
    /// that id.
    pub fn ids(mut self, ids: IdGenerator) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Validate inputs, initialise the environment and every agent at the
    /// clock's start time, and return a ready-to-run [`Simulation`].
    pub fn build(self) -> SimResult<Simulation<A, E, C, S, T>> {
        let Self { mut agents, mut env, clock, scheduler, terminator, two_stage, ids } = self;

        // ── Validate ──────────────────────────────────────────────────────
        let mut seen = HashSet::with_capacity(agents.len());
        if let Some(dup) = agents.iter().map(|a| a.id()).find(|&id| !seen.insert(id)) {
            return Err(SimError::DuplicateAgentId(dup));
        }

        if let Some(expected) = scheduler.expected_population() {
            if expected != agents.len() {
                return Err(SimError::PopulationMismatch { expected, got: agents.len() });
            }
        }

        // ── Initialise ────────────────────────────────────────────────────
        let start = clock.start_time();
        env.init(start).map_err(SimError::hook(HookPhase::EnvironmentInit, start))?;
        for agent in &mut agents {
            agent
                .init(start, &env)
                .map_err(SimError::hook(HookPhase::AgentInit, start))?;
        }

        let floor = IdGenerator::after(agents.iter().map(|a| a.id()));
        let ids = match ids {
            Some(ids) if ids.peek() >= floor.peek() => ids,
            Some(ids) => {
                tracing::debug!(
                    requested = %ids.peek(),
                    first = %floor.peek(),
                    "id generator overlaps the initial population; skipping ahead"
                );
                floor
            }
            None => floor,
        };

        Ok(Simulation {
            agents,
            env,
            clock,
            scheduler,
            terminator: terminator.unwrap_or_else(|| Box::new(NeverTerminate)),
            two_stage,
            ids,
            start,
            phase: Phase::Initialized,
        })
    }
}
