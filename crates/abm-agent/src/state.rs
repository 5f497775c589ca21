//! Fixed-length numeric agent state.
//!
//! # One-stage vs two-stage
//!
//! A one-stage state has only the public vector; `step` mutates it in place.
//! A two-stage state also carries a `next_state` buffer of the same length:
//! `step` writes only the buffer, and [`AgentState::commit`] copies it into
//! the public vector once every scheduled agent has stepped.  Neighbors
//! reading `state()` during the tick therefore always see start-of-tick
//! values, whatever the update order.

use crate::{AgentError, AgentResult};

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentState {
    state:      Vec<f32>,
    next_state: Option<Vec<f32>>,
}

impl AgentState {
    /// Zeroed state vector of length `size`, no next-state buffer.
    /// `size` may be zero for agents that carry no numeric state.
    pub fn one_stage(size: usize) -> Self {
        Self {
            state:      vec![0.0; size],
            next_state: None,
        }
    }

    /// Zeroed state and next-state vectors of length `size`.
    ///
    /// Fails with [`AgentError::EmptyTwoStageState`] when `size == 0`.
    pub fn two_stage(size: usize) -> AgentResult<Self> {
        if size == 0 {
            return Err(AgentError::EmptyTwoStageState);
        }
        Ok(Self {
            state:      vec![0.0; size],
            next_state: Some(vec![0.0; size]),
        })
    }

    /// One-stage state initialised from `values`.
    pub fn from_values(values: Vec<f32>) -> Self {
        Self { state: values, next_state: None }
    }

    /// Two-stage state whose current and next vectors both start at `values`.
    pub fn two_stage_from(values: Vec<f32>) -> AgentResult<Self> {
        if values.is_empty() {
            return Err(AgentError::EmptyTwoStageState);
        }
        Ok(Self {
            next_state: Some(values.clone()),
            state:      values,
        })
    }

    #[inline]
    pub fn state(&self) -> &[f32] {
        &self.state
    }

    #[inline]
    pub fn state_mut(&mut self) -> &mut [f32] {
        &mut self.state
    }

    /// `None` for one-stage states.
    #[inline]
    pub fn next_state(&self) -> Option<&[f32]> {
        self.next_state.as_deref()
    }

    #[inline]
    pub fn next_state_mut(&mut self) -> Option<&mut [f32]> {
        self.next_state.as_deref_mut()
    }

    /// Overwrite the whole public vector.  Length must not change.
    pub fn set_state(&mut self, values: &[f32]) -> AgentResult<()> {
        if values.len() != self.state.len() {
            return Err(AgentError::StateLengthMismatch {
                expected: self.state.len(),
                got:      values.len(),
            });
        }
        self.state.copy_from_slice(values);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    pub fn is_two_stage(&self) -> bool {
        self.next_state.is_some()
    }

    /// Copy `next_state` into `state`.  Returns `false` (and does nothing)
    /// for one-stage states.
    pub fn commit(&mut self) -> bool {
        match &self.next_state {
            Some(next) => {
                self.state.copy_from_slice(next);
                true
            }
            None => false,
        }
    }
}
