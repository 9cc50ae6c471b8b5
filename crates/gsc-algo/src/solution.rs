//! Validated outcome of solving a transport model.

use gsc_core::{CentreId, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Outcome category. Never an error: every run ends in one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolutionStatus {
    Optimal,
    Infeasible,
    SolverError,
}

impl SolutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SolutionStatus::Optimal => "optimal",
            SolutionStatus::Infeasible => "infeasible",
            SolutionStatus::SolverError => "solver_error",
        }
    }
}

impl std::fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One shipped amount on route `centre → node`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowEntry {
    pub centre: CentreId,
    pub node: NodeId,
    pub amount: f64,
}

/// Flows and objective for a transport model.
///
/// `flows` and `objective_value` are only meaningful when `status` is
/// [`SolutionStatus::Optimal`]; otherwise `flows` is empty and `message`
/// explains why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub status: SolutionStatus,
    #[serde(with = "flow_entries")]
    pub flows: BTreeMap<(CentreId, NodeId), f64>,
    pub objective_value: Option<f64>,
    pub message: Option<String>,
    /// Id of the backend that produced the values (empty if none ran)
    pub backend: String,
    pub solve_time: Duration,
    /// Engine iterations, when the backend reports them
    #[serde(default)]
    pub iterations: Option<usize>,
}

impl Solution {
    pub fn optimal(
        flows: BTreeMap<(CentreId, NodeId), f64>,
        objective_value: f64,
        backend: impl Into<String>,
    ) -> Self {
        Self {
            status: SolutionStatus::Optimal,
            flows,
            objective_value: Some(objective_value),
            message: None,
            backend: backend.into(),
            solve_time: Duration::ZERO,
            iterations: None,
        }
    }

    pub fn infeasible(message: impl Into<String>) -> Self {
        Self::failed(SolutionStatus::Infeasible, message)
    }

    pub fn solver_error(message: impl Into<String>) -> Self {
        Self::failed(SolutionStatus::SolverError, message)
    }

    fn failed(status: SolutionStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            flows: BTreeMap::new(),
            objective_value: None,
            message: Some(message.into()),
            backend: String::new(),
            solve_time: Duration::ZERO,
            iterations: None,
        }
    }

    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = backend.into();
        self
    }

    pub fn with_solve_time(mut self, solve_time: Duration) -> Self {
        self.solve_time = solve_time;
        self
    }

    pub fn with_iterations(mut self, iterations: Option<usize>) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }

    /// Shipped amount on a route, 0 when absent.
    pub fn flow(&self, centre: CentreId, node: NodeId) -> f64 {
        self.flows.get(&(centre, node)).copied().unwrap_or(0.0)
    }

    pub fn total_shipped(&self) -> f64 {
        self.flows.values().sum()
    }

    pub fn shipped_from(&self, centre: CentreId) -> f64 {
        self.flows
            .iter()
            .filter(|((c, _), _)| *c == centre)
            .map(|(_, v)| v)
            .sum()
    }

    pub fn received_by(&self, node: NodeId) -> f64 {
        self.flows
            .iter()
            .filter(|((_, n), _)| *n == node)
            .map(|(_, v)| v)
            .sum()
    }
}

/// Tuple-keyed maps are not valid JSON objects, so flows go over the wire as
/// a list of [`FlowEntry`].
mod flow_entries {
    use super::FlowEntry;
    use gsc_core::{CentreId, NodeId};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(
        flows: &BTreeMap<(CentreId, NodeId), f64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let entries: Vec<FlowEntry> = flows
            .iter()
            .map(|(&(centre, node), &amount)| FlowEntry { centre, node, amount })
            .collect();
        entries.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<(CentreId, NodeId), f64>, D::Error> {
        let entries = Vec::<FlowEntry>::deserialize(deserializer)?;
        Ok(entries
            .into_iter()
            .map(|e| ((e.centre, e.node), e.amount))
            .collect())
    }
}
