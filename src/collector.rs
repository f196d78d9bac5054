use std::time::{Duration, Instant};

use log::debug;

use crate::error::{Error, Result};
use crate::solver::{Assignment, Completion, Enumeration};

/// Summary of one solve.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SolveReport {
    /// Worlds found. Zero with [`Completion::Exhaustive`] means the facts contradict each other.
    pub solutions: usize,
    /// How the enumeration ended.
    pub completion: Completion,
    /// Wall-clock time spent enumerating.
    pub elapsed: Duration,
}

/// Every world produced by one enumeration, in arrival order.
#[derive(Clone, Debug)]
pub struct SolutionCollector {
    solutions: Vec<Assignment>,
    completion: Completion,
    elapsed: Duration,
}

impl SolutionCollector {
    /// Drain `enumeration`, keeping each world as it arrives.
    pub fn collect(mut enumeration: Enumeration) -> Result<Self> {
        let started = Instant::now();
        let solutions = enumeration.by_ref().collect::<Vec<_>>();
        let completion = enumeration.finish()?
            .ok_or_else(|| Error::Engine("enumeration ended without a completion status".to_owned()))?;
        let elapsed = started.elapsed();

        debug!(target: "collector", "collected {} worlds ({:?}) in {:?}", solutions.len(), completion, elapsed);
        Ok(Self { solutions, completion, elapsed })
    }

    /// Number of worlds kept.
    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    /// No world was found.
    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    /// The worlds, in arrival order.
    pub fn solutions(&self) -> &[Assignment] {
        &self.solutions
    }

    /// How the enumeration ended.
    pub fn completion(&self) -> Completion {
        self.completion
    }

    /// Counts and timing, without the worlds themselves.
    pub fn report(&self) -> SolveReport {
        SolveReport {
            solutions: self.solutions.len(),
            completion: self.completion,
            elapsed: self.elapsed,
        }
    }
}
