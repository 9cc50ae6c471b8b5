//! Transport LP formulation.
//!
//! ```text
//! minimize    Σ_c Σ_n cost(c,n) · x(c,n)
//!
//! subject to:
//!   Σ_n x(c,n) ≤ capacity(c)      for every centre c   (production limit)
//!   Σ_c x(c,n) ≥ demand(n)        for every node n     (demand fulfilment)
//!   x(c,n) ≥ 0                                         (non-negative flow)
//! ```
//!
//! The model is a plain typed container: building it performs no optimization
//! and touches no solver, so it can be inspected, exported or handed to any
//! [`LpBackend`](crate::solver::LpBackend).

use gsc_core::{CentreId, CostMatrix, GscError, GscResult, Instance, NodeId};
use serde::Serialize;

/// Position of a variable in [`TransportModel::variables`].
pub type VarIndex = usize;

/// Units shipped on one route. One per (centre, node) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowVariable {
    pub index: VarIndex,
    pub centre: CentreId,
    pub node: NodeId,
    /// Objective coefficient (cost per unit)
    pub cost: f64,
    pub lower_bound: f64,
}

impl FlowVariable {
    /// Name used in LP exports
    pub fn name(&self) -> String {
        format!("x_{}_{}", self.centre.value(), self.node.value())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sense {
    /// `activity ≤ rhs`
    Le,
    /// `activity ≥ rhs`
    Ge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConstraintKind {
    Capacity(CentreId),
    Demand(NodeId),
}

impl ConstraintKind {
    pub fn name(&self) -> String {
        match self {
            ConstraintKind::Capacity(c) => format!("capacity_{}", c.value()),
            ConstraintKind::Demand(n) => format!("demand_{}", n.value()),
        }
    }
}

/// One linear row `Σ coeff · x  (≤|≥)  rhs`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearConstraint {
    pub kind: ConstraintKind,
    pub terms: Vec<(VarIndex, f64)>,
    pub sense: Sense,
    pub rhs: f64,
}

impl LinearConstraint {
    pub fn activity(&self, values: &[f64]) -> f64 {
        self.terms.iter().map(|&(i, a)| a * values[i]).sum()
    }

    /// Amount by which `values` violate this row (0 when satisfied).
    pub fn violation(&self, values: &[f64]) -> f64 {
        let activity = self.activity(values);
        match self.sense {
            Sense::Le => (activity - self.rhs).max(0.0),
            Sense::Ge => (self.rhs - activity).max(0.0),
        }
    }
}

/// Linear cost to minimize.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Objective {
    /// Coefficient per variable, aligned with `variables`
    pub coefficients: Vec<f64>,
}

/// Complete LP for one instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransportModel {
    pub variables: Vec<FlowVariable>,
    /// Capacity rows (one per centre) followed by demand rows (one per node)
    pub constraints: Vec<LinearConstraint>,
    pub objective: Objective,
    num_centres: usize,
    num_nodes: usize,
}

impl TransportModel {
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn num_centres(&self) -> usize {
        self.num_centres
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Variable index for the centre at row `i` and node at column `j`.
    #[inline]
    pub fn variable_index(&self, i: usize, j: usize) -> VarIndex {
        i * self.num_nodes + j
    }

    pub fn capacity_constraints(&self) -> &[LinearConstraint] {
        &self.constraints[..self.num_centres]
    }

    pub fn demand_constraints(&self) -> &[LinearConstraint] {
        &self.constraints[self.num_centres..]
    }

    /// Left-hand side of `constraint` under `values`.
    pub fn row_activity(&self, constraint: &LinearConstraint, values: &[f64]) -> f64 {
        constraint.activity(values)
    }

    /// Objective value of an assignment.
    pub fn evaluate_objective(&self, values: &[f64]) -> f64 {
        self.objective
            .coefficients
            .iter()
            .zip(values)
            .map(|(c, x)| c * x)
            .sum()
    }
}

/// Build the transport LP for `instance` with coefficients from `costs`.
///
/// Produces exactly `|centres| · |nodes|` variables in centre-major order.
pub fn build(instance: &Instance, costs: &CostMatrix) -> GscResult<TransportModel> {
    if !costs.matches(instance) {
        return Err(GscError::invalid(format!(
            "cost matrix is {}x{} but instance has {} centres and {} nodes",
            costs.num_centres(),
            costs.num_nodes(),
            instance.num_centres(),
            instance.num_nodes()
        )));
    }

    let num_centres = instance.num_centres();
    let num_nodes = instance.num_nodes();

    let mut variables = Vec::with_capacity(num_centres * num_nodes);
    for (i, centre) in instance.centres().iter().enumerate() {
        for (j, node) in instance.nodes().iter().enumerate() {
            variables.push(FlowVariable {
                index: i * num_nodes + j,
                centre: centre.id,
                node: node.id,
                cost: costs.cost_at(i, j),
                lower_bound: 0.0,
            });
        }
    }

    let mut constraints = Vec::with_capacity(num_centres + num_nodes);
    for (i, centre) in instance.centres().iter().enumerate() {
        constraints.push(LinearConstraint {
            kind: ConstraintKind::Capacity(centre.id),
            terms: (0..num_nodes).map(|j| (i * num_nodes + j, 1.0)).collect(),
            sense: Sense::Le,
            rhs: centre.capacity,
        });
    }
    for (j, node) in instance.nodes().iter().enumerate() {
        constraints.push(LinearConstraint {
            kind: ConstraintKind::Demand(node.id),
            terms: (0..num_centres).map(|i| (i * num_nodes + j, 1.0)).collect(),
            sense: Sense::Ge,
            rhs: node.demand,
        });
    }

    let objective = Objective {
        coefficients: variables.iter().map(|v| v.cost).collect(),
    };

    Ok(TransportModel {
        variables,
        constraints,
        objective,
        num_centres,
        num_nodes,
    })
}
