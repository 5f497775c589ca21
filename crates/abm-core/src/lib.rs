//! `abm-core` — foundational types for the `abm` simulation toolkit.
//!
//! This crate is a dependency of every other `abm-*` crate.  It has no
//! `abm-*` dependencies and minimal external ones (only `rand`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `IdGenerator`                                   |
//! | [`time`]        | `SimTime`, `DiscreteTime`, `Clock`, `FixedClock`, `UnboundedClock`, `SimConfig` |
//! | [`rng`]         | `SimRng` (caller-seeded scheduler RNG)                     |
//! | [`error`]       | `BoxError`, `HookResult`                                   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids and `SimConfig`.     |

pub mod error;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{BoxError, HookResult};
pub use ids::{AgentId, IdGenerator};
pub use rng::SimRng;
pub use time::{
    Clock, ConfiguredClock, DiscreteTime, FixedClock, SimConfig, SimTime, UnboundedClock,
};
