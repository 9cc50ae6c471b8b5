//! Aggregate capacity pre-check.
//!
//! `Σ capacity ≥ Σ demand` is necessary for a feasible transport plan. It is
//! not sufficient in general, but in this model every centre can ship to every
//! node without route limits, so the only remaining source of infeasibility is
//! the engine itself. The check exists to skip building and solving models that
//! cannot succeed.

use gsc_core::Instance;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feasibility {
    Feasible,
    /// Total capacity is below total demand
    InfeasibleCapacity,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeasibilityReport {
    pub verdict: Feasibility,
    pub total_capacity: f64,
    pub total_demand: f64,
}

impl FeasibilityReport {
    pub fn is_feasible(&self) -> bool {
        self.verdict == Feasibility::Feasible
    }

    /// Spare capacity (negative when short)
    pub fn slack(&self) -> f64 {
        self.total_capacity - self.total_demand
    }
}

pub fn check(instance: &Instance) -> FeasibilityReport {
    let total_capacity = instance.total_capacity();
    let total_demand = instance.total_demand();
    let verdict = if total_capacity < total_demand {
        Feasibility::InfeasibleCapacity
    } else {
        Feasibility::Feasible
    };
    FeasibilityReport {
        verdict,
        total_capacity,
        total_demand,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsc_core::{CentreId, DemandNode, GeoPoint, NodeId, ProductionCentre};

    fn instance(capacities: &[f64], demands: &[f64]) -> Instance {
        let loc = GeoPoint::new(0.0, 0.0).unwrap();
        let centres = capacities
            .iter()
            .enumerate()
            .map(|(i, &cap)| ProductionCentre::new(CentreId::new(i), loc, 1.0, cap).unwrap())
            .collect();
        let nodes = demands
            .iter()
            .enumerate()
            .map(|(j, &d)| DemandNode::new(NodeId::new(j), loc, d).unwrap())
            .collect();
        Instance::new(centres, nodes).unwrap()
    }

    #[test]
    fn test_shortfall_detected() {
        let report = check(&instance(&[10.0, 5.0], &[8.0, 8.0]));
        assert_eq!(report.verdict, Feasibility::InfeasibleCapacity);
        assert_eq!(report.slack(), -1.0);
        assert!(!report.is_feasible());
    }

    #[test]
    fn test_exact_match_is_feasible() {
        let report = check(&instance(&[10.0, 6.0], &[8.0, 8.0]));
        assert_eq!(report.verdict, Feasibility::Feasible);
        assert_eq!(report.slack(), 0.0);
    }

    #[test]
    fn test_zero_demand_is_feasible() {
        assert!(check(&instance(&[1.0], &[0.0, 0.0])).is_feasible());
    }
}
