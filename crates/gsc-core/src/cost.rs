//! Shipping cost coefficients.
//!
//! ```text
//! cost(c, n) = unit_cost(c) + distance(c, n) · distance_rate
//! ```
//!
//! The matrix is dense (every centre can serve every node) and stored
//! centre-major, matching the variable order of the transport model.

use crate::geodesy;
use crate::{CentreId, GscError, GscResult, Instance, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Economic parameters that turn geography into cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostParams {
    /// Cost per unit shipped per kilometre
    pub distance_rate: f64,
}

impl Default for CostParams {
    fn default() -> Self {
        Self {
            distance_rate: 0.001,
        }
    }
}

impl CostParams {
    pub fn validate(&self) -> GscResult<()> {
        if !(self.distance_rate.is_finite() && self.distance_rate >= 0.0) {
            return Err(GscError::invalid(format!(
                "distance_rate must be finite and non-negative, got {}",
                self.distance_rate
            )));
        }
        Ok(())
    }
}

/// Per-unit shipping cost for every (centre, node) pair of an instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostMatrix {
    centre_ids: Vec<CentreId>,
    node_ids: Vec<NodeId>,
    /// Great-circle lengths in km, centre-major
    distances_km: Vec<f64>,
    /// Cost per unit, centre-major
    costs: Vec<f64>,
    params: CostParams,
    #[serde(skip)]
    centre_index: HashMap<CentreId, usize>,
    #[serde(skip)]
    node_index: HashMap<NodeId, usize>,
}

impl CostMatrix {
    /// Compute distances and costs for all routes of `instance`.
    pub fn build(instance: &Instance, params: &CostParams) -> GscResult<Self> {
        params.validate()?;

        let n_centres = instance.num_centres();
        let n_nodes = instance.num_nodes();
        let mut distances_km = Vec::with_capacity(n_centres * n_nodes);
        let mut costs = Vec::with_capacity(n_centres * n_nodes);

        for centre in instance.centres() {
            for node in instance.nodes() {
                let d = geodesy::distance(&centre.location, &node.location).value();
                distances_km.push(d);
                costs.push(centre.unit_cost + d * params.distance_rate);
            }
        }

        let centre_ids: Vec<CentreId> = instance.centres().iter().map(|c| c.id).collect();
        let node_ids: Vec<NodeId> = instance.nodes().iter().map(|n| n.id).collect();
        let centre_index = centre_ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        let node_index = node_ids.iter().enumerate().map(|(j, id)| (*id, j)).collect();

        Ok(Self {
            centre_ids,
            node_ids,
            distances_km,
            costs,
            params: *params,
            centre_index,
            node_index,
        })
    }

    pub fn num_centres(&self) -> usize {
        self.centre_ids.len()
    }

    pub fn num_nodes(&self) -> usize {
        self.node_ids.len()
    }

    pub fn params(&self) -> &CostParams {
        &self.params
    }

    pub fn centre_ids(&self) -> &[CentreId] {
        &self.centre_ids
    }

    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_ids
    }

    /// True when the matrix was built for exactly this instance's ids, in order.
    pub fn matches(&self, instance: &Instance) -> bool {
        self.centre_ids.len() == instance.num_centres()
            && self.node_ids.len() == instance.num_nodes()
            && self.centre_ids.iter().zip(instance.centres()).all(|(id, c)| *id == c.id)
            && self.node_ids.iter().zip(instance.nodes()).all(|(id, n)| *id == n.id)
    }

    /// Cost by position (centre row `i`, node column `j`).
    #[inline]
    pub fn cost_at(&self, i: usize, j: usize) -> f64 {
        self.costs[i * self.node_ids.len() + j]
    }

    /// Distance by position, in km.
    #[inline]
    pub fn distance_at(&self, i: usize, j: usize) -> f64 {
        self.distances_km[i * self.node_ids.len() + j]
    }

    fn position(&self, centre: CentreId, node: NodeId) -> Option<(usize, usize)> {
        Some((*self.centre_index.get(&centre)?, *self.node_index.get(&node)?))
    }

    pub fn get(&self, centre: CentreId, node: NodeId) -> Option<f64> {
        self.position(centre, node).map(|(i, j)| self.cost_at(i, j))
    }

    pub fn get_distance(&self, centre: CentreId, node: NodeId) -> Option<f64> {
        self.position(centre, node).map(|(i, j)| self.distance_at(i, j))
    }

    /// Cost per unit on route `centre → node`.
    ///
    /// # Panics
    ///
    /// Panics if either id is not part of the instance the matrix was built from.
    pub fn cost(&self, centre: CentreId, node: NodeId) -> f64 {
        match self.get(centre, node) {
            Some(c) => c,
            None => panic!("no cost entry for route {} -> {}", centre, node),
        }
    }

    /// Iterate `(centre, node, cost)` in centre-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CentreId, NodeId, f64)> + '_ {
        let n_nodes = self.node_ids.len();
        self.costs.iter().enumerate().map(move |(k, &cost)| {
            (self.centre_ids[k / n_nodes], self.node_ids[k % n_nodes], cost)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DemandNode, GeoPoint, ProductionCentre};
    use std::f64::consts::PI;

    fn two_by_two() -> Instance {
        let centres = vec![
            ProductionCentre::new(CentreId::new(0), GeoPoint::new(0.0, 0.0).unwrap(), 1.0, 10.0)
                .unwrap(),
            ProductionCentre::new(CentreId::new(1), GeoPoint::new(0.0, 180.0).unwrap(), 2.0, 10.0)
                .unwrap(),
        ];
        let nodes = vec![
            DemandNode::new(NodeId::new(0), GeoPoint::new(0.0, 0.0).unwrap(), 1.0).unwrap(),
            DemandNode::new(NodeId::new(1), GeoPoint::new(0.0, 90.0).unwrap(), 1.0).unwrap(),
        ];
        Instance::new(centres, nodes).unwrap()
    }

    #[test]
    fn test_costs_add_unit_cost_and_distance() {
        let instance = two_by_two();
        let costs = CostMatrix::build(&instance, &CostParams { distance_rate: 0.5 }).unwrap();
        let r = geodesy::EARTH_RADIUS_KM;

        // Co-located centre and node pay only production cost.
        assert_eq!(costs.cost(CentreId::new(0), NodeId::new(0)), 1.0);
        assert!((costs.cost(CentreId::new(0), NodeId::new(1)) - (1.0 + 0.5 * PI / 2.0 * r)).abs() < 1e-6);
        assert!((costs.cost(CentreId::new(1), NodeId::new(0)) - (2.0 + 0.5 * PI * r)).abs() < 1e-6);
        assert!((costs.get_distance(CentreId::new(1), NodeId::new(1)).unwrap() - PI / 2.0 * r).abs() < 1e-6);
    }

    #[test]
    fn test_zero_rate_is_production_cost_only() {
        let instance = two_by_two();
        let costs = CostMatrix::build(&instance, &CostParams { distance_rate: 0.0 }).unwrap();
        for (centre, _, cost) in costs.iter() {
            assert_eq!(cost, instance.centre(centre).unwrap().unit_cost);
        }
    }

    #[test]
    fn test_negative_rate_rejected() {
        let instance = two_by_two();
        let err = CostMatrix::build(&instance, &CostParams { distance_rate: -1.0 });
        assert!(matches!(err, Err(GscError::InvalidParameter(_))));
    }

    #[test]
    fn test_iter_order_is_centre_major() {
        let instance = two_by_two();
        let costs = CostMatrix::build(&instance, &CostParams::default()).unwrap();
        let order: Vec<(usize, usize)> = costs
            .iter()
            .map(|(c, n, _)| (c.value(), n.value()))
            .collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
        assert!(costs.matches(&instance));
        assert!(costs.get(CentreId::new(5), NodeId::new(0)).is_none());
    }
}
