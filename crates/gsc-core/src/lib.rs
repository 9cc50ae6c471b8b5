//! # gsc-core: Supply-Chain Data Model
//!
//! Fundamental data structures for single-commodity transport problems on a
//! spherical Earth: production centres with capacities and unit costs, demand
//! nodes with requirements, and the distance-derived shipping cost matrix.
//!
//! ## Quick Start
//!
//! ```rust
//! use gsc_core::*;
//!
//! let centre = ProductionCentre::new(
//!     CentreId::new(0),
//!     GeoPoint::new(0.0, 0.0)?,
//!     1.0,   // unit production cost
//!     100.0, // capacity
//! )?;
//! let node = DemandNode::new(NodeId::new(0), GeoPoint::new(0.0, 90.0)?, 50.0)?;
//!
//! let instance = Instance::new(vec![centre], vec![node])?;
//! let costs = CostMatrix::build(&instance, &CostParams { distance_rate: 1.0 })?;
//!
//! let quarter = std::f64::consts::FRAC_PI_2 * geodesy::EARTH_RADIUS_KM;
//! assert!((costs.cost(CentreId::new(0), NodeId::new(0)) - (1.0 + quarter)).abs() < 1e-6);
//! # Ok::<(), gsc_core::GscError>(())
//! ```
//!
//! ## ID System
//!
//! Centres and nodes carry 0-based ordinal ids wrapped in [`CentreId`] and
//! [`NodeId`], so a centre index can never be passed where a node index is
//! expected. Within an [`Instance`] ids are unique per sequence.
//!
//! ## Modules
//!
//! - [`geodesy`] - haversine great-circle distance
//! - [`cost`] - [`CostMatrix`] construction
//! - [`units`] - angle and distance newtypes
//! - [`error`] - [`GscError`] taxonomy

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub mod cost;
pub mod error;
pub mod geodesy;
pub mod units;

pub use cost::{CostMatrix, CostParams};
pub use error::{GscError, GscResult};
pub use units::{Degrees, Kilometres, Radians};

// Newtype wrappers for IDs for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CentreId(usize);
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl CentreId {
    #[inline]
    pub fn new(value: usize) -> Self {
        CentreId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl NodeId {
    #[inline]
    pub fn new(value: usize) -> Self {
        NodeId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for CentreId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "C{}", self.0)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "N{}", self.0)
    }
}

/// A location on the sphere, in degrees.
///
/// Latitude is in `[-90, 90]`, longitude in `[-180, 180]`. Fields are private
/// so every value that exists has passed [`GeoPoint::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LatLon", into = "LatLon")]
pub struct GeoPoint {
    latitude: Degrees,
    longitude: Degrees,
}

/// Unchecked wire form of a [`GeoPoint`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LatLon {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> GscResult<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GscError::invalid(format!(
                "latitude {} outside [-90, 90]",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GscError::invalid(format!(
                "longitude {} outside [-180, 180]",
                longitude
            )));
        }
        Ok(Self {
            latitude: Degrees(latitude),
            longitude: Degrees(longitude),
        })
    }

    #[inline]
    pub fn latitude(&self) -> Degrees {
        self.latitude
    }

    #[inline]
    pub fn longitude(&self) -> Degrees {
        self.longitude
    }
}

impl TryFrom<LatLon> for GeoPoint {
    type Error = GscError;

    fn try_from(raw: LatLon) -> Result<Self, Self::Error> {
        GeoPoint::new(raw.latitude, raw.longitude)
    }
}

impl From<GeoPoint> for LatLon {
    fn from(p: GeoPoint) -> Self {
        LatLon {
            latitude: p.latitude.value(),
            longitude: p.longitude.value(),
        }
    }
}

/// A production centre (supply side of the transport problem)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionCentre {
    pub id: CentreId,
    pub location: GeoPoint,
    /// Production cost per unit shipped from this centre
    pub unit_cost: f64,
    /// Maximum total outflow
    pub capacity: f64,
}

impl ProductionCentre {
    /// Create a centre, rejecting non-positive or non-finite cost and capacity.
    pub fn new(id: CentreId, location: GeoPoint, unit_cost: f64, capacity: f64) -> GscResult<Self> {
        if !(unit_cost.is_finite() && unit_cost > 0.0) {
            return Err(GscError::invalid(format!(
                "centre {}: unit_cost must be positive, got {}",
                id, unit_cost
            )));
        }
        if !(capacity.is_finite() && capacity > 0.0) {
            return Err(GscError::invalid(format!(
                "centre {}: capacity must be positive, got {}",
                id, capacity
            )));
        }
        Ok(Self {
            id,
            location,
            unit_cost,
            capacity,
        })
    }
}

/// A demand node (sink side of the transport problem)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandNode {
    pub id: NodeId,
    pub location: GeoPoint,
    /// Minimum total inflow
    pub demand: f64,
}

impl DemandNode {
    pub fn new(id: NodeId, location: GeoPoint, demand: f64) -> GscResult<Self> {
        if !(demand.is_finite() && demand >= 0.0) {
            return Err(GscError::invalid(format!(
                "node {}: demand must be non-negative, got {}",
                id, demand
            )));
        }
        Ok(Self {
            id,
            location,
            demand,
        })
    }
}

/// One concrete supply-chain problem prior to solving.
///
/// Both sequences are non-empty and ids are unique within each. Instances are
/// read-only once built; every downstream stage borrows them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    centres: Vec<ProductionCentre>,
    nodes: Vec<DemandNode>,
}

impl Instance {
    pub fn new(centres: Vec<ProductionCentre>, nodes: Vec<DemandNode>) -> GscResult<Self> {
        if centres.is_empty() {
            return Err(GscError::invalid("instance needs at least one production centre"));
        }
        if nodes.is_empty() {
            return Err(GscError::invalid("instance needs at least one demand node"));
        }

        let mut seen = HashSet::with_capacity(centres.len());
        for centre in &centres {
            if !seen.insert(centre.id) {
                return Err(GscError::invalid(format!("duplicate centre id {}", centre.id)));
            }
        }
        let mut seen = HashSet::with_capacity(nodes.len());
        for node in &nodes {
            if !seen.insert(node.id) {
                return Err(GscError::invalid(format!("duplicate node id {}", node.id)));
            }
        }

        Ok(Self { centres, nodes })
    }

    /// Load an instance from JSON, re-checking every invariant.
    pub fn from_json(json: &str) -> GscResult<Self> {
        let raw: Instance = serde_json::from_str(json)?;
        let mut centres = Vec::with_capacity(raw.centres.len());
        for c in raw.centres {
            centres.push(ProductionCentre::new(c.id, c.location, c.unit_cost, c.capacity)?);
        }
        let mut nodes = Vec::with_capacity(raw.nodes.len());
        for n in raw.nodes {
            nodes.push(DemandNode::new(n.id, n.location, n.demand)?);
        }
        Instance::new(centres, nodes)
    }

    #[inline]
    pub fn centres(&self) -> &[ProductionCentre] {
        &self.centres
    }

    #[inline]
    pub fn nodes(&self) -> &[DemandNode] {
        &self.nodes
    }

    pub fn num_centres(&self) -> usize {
        self.centres.len()
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of (centre, node) routes, i.e. flow variables in the model.
    pub fn num_routes(&self) -> usize {
        self.centres.len() * self.nodes.len()
    }

    pub fn centre(&self, id: CentreId) -> Option<&ProductionCentre> {
        self.centres.iter().find(|c| c.id == id)
    }

    pub fn node(&self, id: NodeId) -> Option<&DemandNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn total_capacity(&self) -> f64 {
        self.centres.iter().map(|c| c.capacity).sum()
    }

    pub fn total_demand(&self) -> f64 {
        self.nodes.iter().map(|n| n.demand).sum()
    }
}
