use gsc_algo::PipelineOutcome;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Status label for a run that failed before producing a solution.
pub const ERROR_STATUS: &str = "error";

/// One line of the batch manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRunRecord {
    pub seed: u64,
    /// `optimal`, `infeasible`, `solver_error`, or `error`
    pub status: String,
    pub objective_value: Option<f64>,
    pub total_shipped: f64,
    pub solve_time_ms: u64,
    pub error: Option<String>,
    /// Result file, when results are written
    pub output: Option<String>,
}

impl BatchRunRecord {
    pub fn from_outcome(seed: u64, outcome: &PipelineOutcome, output: Option<String>) -> Self {
        Self {
            seed,
            status: outcome.solution.status.as_str().to_string(),
            objective_value: outcome.solution.objective_value,
            total_shipped: outcome.result.total_shipped,
            solve_time_ms: millis(outcome.solution.solve_time),
            error: outcome.solution.message.clone(),
            output,
        }
    }

    pub fn failed(seed: u64, error: String) -> Self {
        Self {
            seed,
            status: ERROR_STATUS.to_string(),
            objective_value: None,
            total_shipped: 0.0,
            solve_time_ms: 0,
            error: Some(error),
            output: None,
        }
    }
}

fn millis(d: Duration) -> u64 {
    d.as_millis().try_into().unwrap_or(u64::MAX)
}

/// `count` consecutive seeds starting at `start`.
pub fn seed_range(start: u64, count: usize) -> Vec<u64> {
    (0..count as u64).map(|k| start.wrapping_add(k)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_are_consecutive() {
        assert_eq!(seed_range(40, 3), vec![40, 41, 42]);
        assert!(seed_range(7, 0).is_empty());
    }

    #[test]
    fn failed_record_has_error_status() {
        let record = BatchRunRecord::failed(3, "bad range".into());
        assert_eq!(record.status, ERROR_STATUS);
        assert_eq!(record.error.as_deref(), Some("bad range"));
    }
}
