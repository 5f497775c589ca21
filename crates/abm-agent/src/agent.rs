//! The `Agent` trait — the main extension point for model code.

use std::cmp::Ordering;

use abm_core::{AgentId, HookResult, IdGenerator, SimTime};

use crate::{AgentError, AgentResult, AgentState};

/// Pluggable agent behavior.
///
/// # Required methods
///
/// Only [`id`][Self::id] and [`step`][Self::step] are required.  Every other
/// hook has a default so simple models don't need to implement them.
///
/// # Two-stage agents
///
/// Expose an [`AgentState`] built with [`AgentState::two_stage`] through
/// [`agent_state`][Self::agent_state] / [`agent_state_mut`][Self::agent_state_mut],
/// write only `next_state` in `step`, and run the driver in two-stage mode.
/// The default [`complete`][Self::complete] commits the buffer.
///
/// # Example
///
/// ```rust
/// use abm_agent::{Agent, AgentState, NullEnvironment, StepContext};
/// use abm_core::{AgentId, HookResult};
///
/// struct Majority { id: AgentId, state: AgentState }
///
/// impl Agent<NullEnvironment, u64> for Majority {
///     fn id(&self) -> AgentId { self.id }
///     fn agent_state(&self) -> Option<&AgentState> { Some(&self.state) }
///     fn agent_state_mut(&mut self) -> Option<&mut AgentState> { Some(&mut self.state) }
///
///     fn step(&mut self, ctx: &mut StepContext<'_, Self, NullEnvironment, u64>) -> HookResult {
///         let ones = ctx.others.iter().filter(|(_, a)| a.state()[0] > 0.5).count();
///         let next = if 2 * ones > ctx.others.len() { 1.0 } else { 0.0 };
///         if let Some(buf) = self.state.next_state_mut() {
///             buf[0] = next;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Agent<E, T: SimTime>: Sized {
    /// Unique, immutable identity.
    fn id(&self) -> AgentId;

    /// The agent's numeric state, if it keeps one in an [`AgentState`].
    fn agent_state(&self) -> Option<&AgentState> {
        None
    }

    fn agent_state_mut(&mut self) -> Option<&mut AgentState> {
        None
    }

    /// Public state vector.  Empty when the agent has no [`AgentState`].
    fn state(&self) -> &[f32] {
        self.agent_state().map(AgentState::state).unwrap_or(&[])
    }

    /// Called once before the first tick (with the clock's start time), or at
    /// the spawn time for agents born mid-run.
    fn init(&mut self, _now: T, _env: &E) -> HookResult {
        Ok(())
    }

    /// Update the agent for the tick at `ctx.now`.
    ///
    /// The environment is mutable and shared by every agent; think about
    /// update-order conflicts when writing to it.
    fn step(&mut self, ctx: &mut StepContext<'_, Self, E, T>) -> HookResult;

    /// End-of-tick hook, run only in two-stage mode and only for agents that
    /// stepped this tick.  Default: commit `next_state` into `state`.
    fn complete(&mut self, _ctx: &mut StepContext<'_, Self, E, T>) -> HookResult {
        if let Some(state) = self.agent_state_mut() {
            state.commit();
        }
        Ok(())
    }

    /// Agents returning `false` are removed from the population at the end of
    /// the tick.
    fn is_alive(&self) -> bool {
        true
    }
}

// ── Others ────────────────────────────────────────────────────────────────────

/// Read-only view of every agent in the population except the one being
/// updated.
///
/// Indices are population positions (the same indices the scheduler hands
/// out), so `others.get(i)` is `agents[i]` for every `i` other than
/// [`position`](Self::position).
pub struct Others<'a, A> {
    head: &'a [A],
    tail: &'a [A],
}

impl<A> Clone for Others<'_, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A> Copy for Others<'_, A> {}

impl<'a, A> Others<'a, A> {
    /// View over `head ++ [self] ++ tail`.
    pub fn new(head: &'a [A], tail: &'a [A]) -> Self {
        Self { head, tail }
    }

    /// Population index of the agent being updated.
    #[inline]
    pub fn position(&self) -> usize {
        self.head.len()
    }

    /// Size of the whole population, including the agent being updated.
    #[inline]
    pub fn population_len(&self) -> usize {
        self.head.len() + 1 + self.tail.len()
    }

    /// Number of *other* agents.
    #[inline]
    pub fn len(&self) -> usize {
        self.head.len() + self.tail.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The agent at population index `index`.  `None` for the agent being
    /// updated and for out-of-range indices.
    pub fn get(&self, index: usize) -> Option<&'a A> {
        let me = self.position();
        match index.cmp(&me) {
            Ordering::Less    => self.head.get(index),
            Ordering::Equal   => None,
            Ordering::Greater => self.tail.get(index - me - 1),
        }
    }

    /// `(population index, agent)` for every other agent, in population order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &'a A)> + use<'a, A> {
        let skip = self.position() + 1;
        self.head
            .iter()
            .enumerate()
            .chain(self.tail.iter().enumerate().map(move |(i, a)| (i + skip, a)))
    }
}

/// Split `agents` into the agent at `index` and a view of everyone else.
///
/// Returns `None` if `index` is out of range.
pub fn split_at_agent<A>(agents: &mut [A], index: usize) -> Option<(&mut A, Others<'_, A>)> {
    if index >= agents.len() {
        return None;
    }
    let (head, rest) = agents.split_at_mut(index);
    let (me, tail) = rest.split_first_mut()?;
    Some((me, Others::new(head, tail)))
}

// ── StepContext ───────────────────────────────────────────────────────────────

/// Everything an agent hook can touch during one tick.
///
/// Built by the driver for each `step` / `complete` call.
pub struct StepContext<'a, A, E, T> {
    /// Current simulation time.
    pub now: T,

    /// The shared environment.
    pub env: &'a mut E,

    /// Every other agent, read-only.
    pub others: Others<'a, A>,

    ids:     &'a mut IdGenerator,
    spawned: &'a mut Vec<A>,
}

impl<'a, A, E, T: SimTime> StepContext<'a, A, E, T> {
    pub fn new(
        now:     T,
        env:     &'a mut E,
        others:  Others<'a, A>,
        ids:     &'a mut IdGenerator,
        spawned: &'a mut Vec<A>,
    ) -> Self {
        Self { now, env, others, ids, spawned }
    }

    /// A fresh, never-used agent id (for children).
    ///
    /// Fails with [`AgentError::IdsExhausted`] once every `u32` id has been
    /// handed out; hooks propagate it with `?`.
    pub fn next_id(&mut self) -> AgentResult<AgentId> {
        self.ids.next_id().ok_or(AgentError::IdsExhausted)
    }

    /// Queue a new agent.  It is initialised at the current time and joins
    /// the population at the end of the tick, so it is never scheduled in the
    /// tick that created it.
    pub fn spawn(&mut self, agent: A) {
        self.spawned.push(agent);
    }

    /// Agents spawned so far this tick (by any agent).
    pub fn spawned_count(&self) -> usize {
        self.spawned.len()
    }
}
