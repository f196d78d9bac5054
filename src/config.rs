use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default wall-clock limit for one enumeration, in seconds.
pub const DEFAULT_TIME_LIMIT: f64 = 60.0;

/// Limits on a single enumeration of worlds.
///
/// Either limit being hit ends the enumeration with [`Completion::Partial`](crate::Completion::Partial).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveConfig {
    /// Wall-clock limit in seconds. `None` or `0` means no limit.
    pub time_limit: Option<f64>,
    /// Stop after this many worlds.
    pub max_solutions: Option<usize>,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            time_limit: Some(DEFAULT_TIME_LIMIT),
            max_solutions: None,
        }
    }
}

impl SolveConfig {
    /// No limits at all; the enumeration runs until every world has been seen.
    pub fn unbounded() -> Self {
        Self { time_limit: None, max_solutions: None }
    }

    /// Replace the time limit, in seconds.
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    /// Replace the solution cap.
    pub fn with_max_solutions(mut self, count: usize) -> Self {
        self.max_solutions = Some(count);
        self
    }

    /// The time limit as a [`Duration`], rejecting negative and non-finite values.
    pub fn time_budget(&self) -> Result<Option<Duration>> {
        match self.time_limit {
            None => Ok(None),
            Some(seconds) if seconds == 0.0 => Ok(None),
            Some(seconds) => Duration::try_from_secs_f64(seconds)
                .map(Some)
                .map_err(|err| Error::InvalidArgument(format!("time limit {seconds}: {err}"))),
        }
    }
}
