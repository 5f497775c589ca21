//! Strongly typed agent identifiers and the factory that hands them out.
//!
//! Identifiers are assigned by an explicit [`IdGenerator`] rather than a
//! process-wide counter: the driver owns one and lends it to agents that spawn
//! children mid-run, so two simulations in the same process never share a
//! sequence.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$inner> for $name {
            #[inline(always)]
            fn from(raw: $inner) -> $name {
                $name(raw)
            }
        }
    };
}

typed_id! {
    /// Unique, immutable identity of one agent.
    ///
    /// Unlike a population index, an `AgentId` survives reaping and spawning:
    /// positions in the population shift, ids never do.
    pub struct AgentId(u32);
}

// ── IdGenerator ───────────────────────────────────────────────────────────────

/// Monotonic source of fresh [`AgentId`]s.
///
/// ```rust
/// use abm_core::{AgentId, IdGenerator};
///
/// let mut ids = IdGenerator::new();
/// assert_eq!(ids.next_id(), Some(AgentId(1)));
/// assert_eq!(ids.next_id(), Some(AgentId(2)));
/// ```
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IdGenerator {
    next: u32,
}

impl IdGenerator {
    /// Ids start at 1.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u32) -> Self {
        Self { next: first }
    }

    /// A generator whose first id is one past the largest of `existing`
    /// (or 1 when `existing` is empty).
    pub fn after<I>(existing: I) -> Self
    where
        I: IntoIterator<Item = AgentId>,
    {
        let first = existing
            .into_iter()
            .filter(|id| *id != AgentId::INVALID)
            .map(|id| id.0.saturating_add(1))
            .max()
            .unwrap_or(1);
        Self::starting_at(first)
    }

    /// Hand out the next id, or `None` once the `u32` id space is used up
    /// (`u32::MAX` is reserved for [`AgentId::INVALID`]).
    pub fn next_id(&mut self) -> Option<AgentId> {
        if self.next == u32::MAX {
            return None;
        }
        let id = AgentId(self.next);
        self.next += 1;
        Some(id)
    }

    /// The id the next call to [`next_id`](Self::next_id) will return.
    pub fn peek(&self) -> AgentId {
        AgentId(self.next)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for IdGenerator {
    type Item = AgentId;

    fn next(&mut self) -> Option<AgentId> {
        self.next_id()
    }
}
