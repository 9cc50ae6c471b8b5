//! Route-level view of a solution for reporting and map rendering.

use crate::solution::{Solution, SolutionStatus};
use anyhow::{Context, Result};
use gsc_core::{CentreId, CostMatrix, GeoPoint, GscError, GscResult, Instance, NodeId};
use serde::Serialize;
use std::path::Path;

/// Flows at or below this amount are not reported as routes.
pub const ROUTE_THRESHOLD: f64 = 1e-9;

/// A used route with its endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteFlow {
    pub centre: CentreId,
    pub node: NodeId,
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    pub amount: f64,
    /// Cost per unit on this route
    pub unit_cost: f64,
    pub distance_km: f64,
}

impl RouteFlow {
    pub fn cost(&self) -> f64 {
        self.amount * self.unit_cost
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CentreUtilization {
    pub centre: CentreId,
    pub shipped: f64,
    pub capacity: f64,
    /// `shipped / capacity`
    pub ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredResult {
    pub status: SolutionStatus,
    pub message: Option<String>,
    pub routes: Vec<RouteFlow>,
    pub total_cost: f64,
    pub total_shipped: f64,
    pub total_demand: f64,
    /// One entry per centre, in instance order
    pub utilization: Vec<CentreUtilization>,
}

/// Turn a solution into routes and per-centre utilization.
///
/// Non-optimal solutions yield no routes and zero utilization but keep the
/// status and message.
pub fn structure(
    solution: &Solution,
    instance: &Instance,
    costs: &CostMatrix,
) -> GscResult<StructuredResult> {
    if !costs.matches(instance) {
        return Err(GscError::invalid("cost matrix was built for a different instance"));
    }

    let mut routes = Vec::new();
    let mut shipped = vec![0.0; instance.num_centres()];

    if solution.is_optimal() {
        for (i, centre) in instance.centres().iter().enumerate() {
            for (j, node) in instance.nodes().iter().enumerate() {
                let amount = solution.flow(centre.id, node.id);
                if amount <= ROUTE_THRESHOLD {
                    continue;
                }
                shipped[i] += amount;
                routes.push(RouteFlow {
                    centre: centre.id,
                    node: node.id,
                    origin: centre.location,
                    destination: node.location,
                    amount,
                    unit_cost: costs.cost_at(i, j),
                    distance_km: costs.distance_at(i, j),
                });
            }
        }
    }

    let utilization = instance
        .centres()
        .iter()
        .zip(&shipped)
        .map(|(centre, &shipped)| CentreUtilization {
            centre: centre.id,
            shipped,
            capacity: centre.capacity,
            ratio: shipped / centre.capacity,
        })
        .collect();

    let total_cost = if solution.is_optimal() {
        solution
            .objective_value
            .unwrap_or_else(|| routes.iter().map(RouteFlow::cost).sum())
    } else {
        0.0
    };

    Ok(StructuredResult {
        status: solution.status,
        message: solution.message.clone(),
        total_shipped: routes.iter().map(|r| r.amount).sum(),
        total_demand: instance.total_demand(),
        total_cost,
        routes,
        utilization,
    })
}

impl StructuredResult {
    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }

    pub fn routes_from(&self, centre: CentreId) -> impl Iterator<Item = &RouteFlow> {
        self.routes.iter().filter(move |r| r.centre == centre)
    }

    /// Human-readable report.
    pub fn summary(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("Supply Chain Solution\n{}\n", "=".repeat(40)));
        s.push_str(&format!("Status: {}\n", self.status));
        if let Some(msg) = &self.message {
            s.push_str(&format!("Message: {}\n", msg));
        }
        if !self.is_optimal() {
            return s;
        }
        s.push_str(&format!("Total Cost: {:.4}\n", self.total_cost));
        s.push_str(&format!(
            "Shipped: {:.4} of {:.4} demanded\n",
            self.total_shipped, self.total_demand
        ));
        s.push_str(&format!("Routes Used: {}\n", self.routes.len()));

        s.push_str("\nCentre Utilization:\n");
        for u in &self.utilization {
            s.push_str(&format!(
                "  {:<6} {:>10.4} / {:>10.4}  ({:>5.1}%)\n",
                u.centre.to_string(),
                u.shipped,
                u.capacity,
                u.ratio * 100.0
            ));
        }
        s
    }

    /// Export to JSON format
    pub fn to_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("serializing result to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("writing JSON to {}", path.display()))?;
        Ok(())
    }

    /// Export the route table to CSV
    pub fn to_csv(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating CSV file {}", path.display()))?;
        self.write_csv(file)
    }

    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record([
            "centre",
            "node",
            "origin_lat",
            "origin_lon",
            "dest_lat",
            "dest_lon",
            "amount",
            "unit_cost",
            "distance_km",
        ])
        .context("writing CSV header")?;

        for r in &self.routes {
            wtr.write_record(&[
                r.centre.value().to_string(),
                r.node.value().to_string(),
                r.origin.latitude().value().to_string(),
                r.origin.longitude().value().to_string(),
                r.destination.latitude().value().to_string(),
                r.destination.longitude().value().to_string(),
                r.amount.to_string(),
                r.unit_cost.to_string(),
                r.distance_km.to_string(),
            ])
            .context("writing CSV record")?;
        }

        wtr.flush().context("flushing CSV writer")?;
        Ok(())
    }
}
