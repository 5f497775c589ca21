//! `abm-sim` — the simulation driver for the abm toolkit.
//!
//! # Tick loop
//!
//! ```text
//! build():   Environment::init(start); Agent::init(start, &env) for each agent
//! run():     Observer::start(start)
//!            for now in clock:
//!              ① Environment::step(now, &agents)
//!              ② selected = Scheduler::schedule(now, &agents, &env)
//!              ③ Agent::step(ctx)       for i in selected
//!              ④ Agent::complete(ctx)   for i in selected   (two-stage only)
//!              ⑤ spawned agents init + join; dead agents are reaped
//!              ⑥ Environment::complete(now, &agents)
//!              ⑦ Observer::step(now, &agents, &env)
//!              ⑧ Terminator::test(now, …) → stop early on `true`
//!            Observer::stop(last time)
//! ```
//!
//! Any hook failure aborts the run with [`SimError::Hook`], tagged with the
//! phase and time at which it happened.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use abm_agent::NullEnvironment;
//! use abm_core::FixedClock;
//! use abm_schedule::InOrderScheduler;
//! use abm_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(agents, NullEnvironment, FixedClock::ticks(100), InOrderScheduler)
//!     .two_stage(true)
//!     .build()?;
//! let summary = sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;
pub mod terminator;


pub use builder::SimBuilder;
pub use error::{HookPhase, SimError, SimResult};
pub use observer::{
    ChainedObserver, KeyPauseObserver, NoopObserver, Observer, PauseAtEndObserver, PauseObserver,
};
pub use sim::{Phase, RunSummary, Simulation, StopReason};
pub use terminator::{NeverTerminate, StopAtTime, Terminator};
