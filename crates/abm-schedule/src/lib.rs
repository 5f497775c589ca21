//! `abm-schedule` — policies deciding which agents update each tick.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`scheduler`]   | `Scheduler` trait, in-order / random-order / random-sample / Bernoulli |
//! | [`precomputed`] | `PrecomputedBernoulliScheduler` (time-keyed activation table) |
//! | [`error`]       | `ScheduleError`, `ScheduleResult<T>`                      |
//!
//! # Contract (summary)
//!
//! ```text
//! schedule(now, agents, env) -> indices into `agents`
//! ```
//!
//! The driver steps the returned indices in order and, in two-stage runs,
//! completes exactly the same sequence.  Randomised policies own a
//! caller-seeded `SimRng`, so a run is reproducible from its seed.

pub mod error;
pub mod precomputed;
pub mod scheduler;

#[cfg(test)]
mod tests;

pub use error::{ScheduleError, ScheduleResult};
pub use precomputed::PrecomputedBernoulliScheduler;
pub use scheduler::{
    BernoulliScheduler, InOrderScheduler, RandomOrderScheduler, RandomSampleScheduler, Scheduler,
};
