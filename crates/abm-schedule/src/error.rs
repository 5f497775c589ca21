use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ScheduleError {
    #[error("probability {0} is outside [0, 1]")]
    InvalidProbability(f64),

    #[error("sample size {size} exceeds population of {population}")]
    SampleExceedsPopulation {
        size:       usize,
        population: usize,
    },

    #[error("schedule was built for {expected} agents but the population has {got}")]
    PopulationMismatch {
        expected: usize,
        got:      usize,
    },

    #[error("schedule horizon ends ({stop}) before it starts ({start})")]
    InvalidHorizon {
        start: String,
        stop:  String,
    },
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Reject probabilities outside `[0, 1]` (including NaN).
pub(crate) fn check_probability(p: f64) -> ScheduleResult<f64> {
    if (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(ScheduleError::InvalidProbability(p))
    }
}
