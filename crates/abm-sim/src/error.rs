use std::fmt;

use abm_core::{AgentId, BoxError};
use abm_schedule::ScheduleError;
use thiserror::Error;

/// Where in the run a user hook failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookPhase {
    EnvironmentInit,
    AgentInit,
    EnvironmentStep,
    AgentStep,
    AgentComplete,
    SpawnInit,
    EnvironmentComplete,
    ObserverStart,
    ObserverStep,
    ObserverStop,
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HookPhase::EnvironmentInit     => "environment init",
            HookPhase::AgentInit           => "agent init",
            HookPhase::EnvironmentStep     => "environment step",
            HookPhase::AgentStep           => "agent step",
            HookPhase::AgentComplete       => "agent complete",
            HookPhase::SpawnInit           => "spawned agent init",
            HookPhase::EnvironmentComplete => "environment complete",
            HookPhase::ObserverStart       => "observer start",
            HookPhase::ObserverStep        => "observer step",
            HookPhase::ObserverStop        => "observer stop",
        };
        f.write_str(name)
    }
}

/// Simulation errors.  Times are carried pre-formatted so the error type does
/// not depend on the run's time type.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("duplicate agent id {0}")]
    DuplicateAgentId(AgentId),

    #[error("scheduler was built for {expected} agents but the population has {got}")]
    PopulationMismatch {
        expected: usize,
        got:      usize,
    },

    #[error("simulation has already been run")]
    AlreadyRun,

    #[error("scheduler selected index {index} at time {time} but the population has {population} agents")]
    IndexOutOfRange {
        index:      usize,
        population: usize,
        time:       String,
    },

    #[error("scheduling failed at time {time}: {source}")]
    Schedule {
        time:   String,
        #[source]
        source: ScheduleError,
    },

    #[error("{phase} hook failed at time {time}: {source}")]
    Hook {
        phase:  HookPhase,
        time:   String,
        #[source]
        source: BoxError,
    },
}

impl SimError {
    /// Adapter for `map_err` on a hook result.  `time` is only formatted
    /// when the hook actually failed.
    pub(crate) fn hook<D: fmt::Display>(phase: HookPhase, time: D) -> impl FnOnce(BoxError) -> SimError {
        move |source| SimError::Hook { phase, time: time.to_string(), source }
    }
}

pub type SimResult<T> = Result<T, SimError>;
