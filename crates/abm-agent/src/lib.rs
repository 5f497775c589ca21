//! `abm-agent` — the per-tick update protocol between the driver, agents, and
//! the environment.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`agent`]       | `Agent` trait, `StepContext`, `Others` population view     |
//! | [`environment`] | `Environment` trait, `NullEnvironment`                     |
//! | [`state`]       | `AgentState` (current + optional next state vector)        |
//! | [`error`]       | `AgentError`, `AgentResult<T>`                             |
//!
//! # Hook order within one tick
//!
//! ```text
//! Environment::step(now, &agents)
//! for i in schedule:  agents[i].step(ctx)
//! for i in schedule:  agents[i].complete(ctx)      (two-stage runs only)
//! Environment::complete(now, &agents)
//! ```
//!
//! Every agent hook sees the environment mutably and every *other* agent
//! read-only.  In one-stage runs a change made by one agent is visible to the
//! agents that step after it in the same tick; two-stage runs defer
//! visibility by writing `next_state` and committing in `complete`.

pub mod agent;
pub mod environment;
pub mod error;
pub mod state;


pub use agent::{split_at_agent, Agent, Others, StepContext};
pub use environment::{Environment, NullEnvironment};
pub use error::{AgentError, AgentResult};
pub use state::AgentState;
