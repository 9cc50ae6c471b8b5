//! Random instance generation.
//!
//! ## Uniform placement on the sphere
//!
//! Drawing latitude uniformly in `[-90, 90]` over-samples the poles, because a
//! band of latitude near a pole has far less surface area than the same band at
//! the equator. Sampling `u ~ U[-1, 1]` and taking `φ = asin(u)` instead gives
//! points whose density is uniform over the surface (Archimedes' hat-box
//! theorem: area between two latitudes is proportional to `sin φ₂ − sin φ₁`).
//! Longitude is uniform in `[-180, 180)`.
//!
//! ## Reproducibility
//!
//! Every call owns its RNG. With a seed the stream is `ChaCha8Rng` seeded from
//! it, so identical `(seed, counts, config)` give identical instances on every
//! platform. Without a seed the RNG is seeded from OS entropy.
//!
//! Draw order is fixed: centre locations, node locations, demands, capacities,
//! unit costs.

use gsc_core::{
    CentreId, DemandNode, GeoPoint, GscError, GscResult, Instance, NodeId, ProductionCentre,
};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Smallest capacity the demand-scaled scheme will emit.
const MIN_SCALED_CAPACITY: f64 = 1e-9;

/// Closed interval `[min, max]` for a uniformly drawn parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
}

impl ParamRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn validate(&self, name: &str, strictly_positive: bool) -> GscResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(GscError::invalid(format!(
                "{} range [{}, {}] must be finite",
                name, self.min, self.max
            )));
        }
        if self.min > self.max {
            return Err(GscError::invalid(format!(
                "{} range is inverted: min {} > max {}",
                name, self.min, self.max
            )));
        }
        if strictly_positive && self.min <= 0.0 {
            return Err(GscError::invalid(format!(
                "{} range must be positive, got min {}",
                name, self.min
            )));
        }
        if !strictly_positive && self.min < 0.0 {
            return Err(GscError::invalid(format!(
                "{} range must be non-negative, got min {}",
                name, self.min
            )));
        }
        Ok(())
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.gen_range(self.min..=self.max)
    }
}

/// How centre capacities are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum CapacityScheme {
    /// Independent draws from a fixed range.
    Uniform(ParamRange),
    /// Draws from `[D/m, D/m + flexibility · n]` where `D` is total demand,
    /// `m` the centre count and `n` the node count.
    ///
    /// Every centre can carry at least an equal share of the total demand, so
    /// the instance always passes the aggregate feasibility check.
    DemandScaled { flexibility: f64 },
}

/// Parameter ranges for [`generate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub unit_cost: ParamRange,
    pub capacity: CapacityScheme,
    pub demand: ParamRange,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            unit_cost: ParamRange::new(0.5, 2.0),
            capacity: CapacityScheme::Uniform(ParamRange::new(50.0, 150.0)),
            demand: ParamRange::new(0.0, 10.0),
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> GscResult<()> {
        self.unit_cost.validate("unit_cost", true)?;
        self.demand.validate("demand", false)?;
        match self.capacity {
            CapacityScheme::Uniform(range) => range.validate("capacity", true)?,
            CapacityScheme::DemandScaled { flexibility } => {
                if !(flexibility.is_finite() && flexibility >= 0.0) {
                    return Err(GscError::invalid(format!(
                        "capacity flexibility must be non-negative, got {}",
                        flexibility
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Generate a random instance with `num_centres` centres and `num_nodes` nodes.
///
/// # Example
///
/// ```
/// use gsc_algo::generator::{generate, GeneratorConfig};
///
/// let config = GeneratorConfig::default();
/// let a = generate(3, 8, Some(42), &config)?;
/// let b = generate(3, 8, Some(42), &config)?;
/// assert_eq!(a, b);
/// # Ok::<(), gsc_core::GscError>(())
/// ```
pub fn generate(
    num_centres: usize,
    num_nodes: usize,
    seed: Option<u64>,
    config: &GeneratorConfig,
) -> GscResult<Instance> {
    let mut rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    debug!(num_centres, num_nodes, ?seed, "generating instance");
    generate_with_rng(num_centres, num_nodes, config, &mut rng)
}

/// Generate an instance drawing from a caller-owned RNG.
pub fn generate_with_rng<R: Rng + ?Sized>(
    num_centres: usize,
    num_nodes: usize,
    config: &GeneratorConfig,
    rng: &mut R,
) -> GscResult<Instance> {
    if num_centres == 0 {
        return Err(GscError::invalid("num_centres must be positive"));
    }
    if num_nodes == 0 {
        return Err(GscError::invalid("num_nodes must be positive"));
    }
    config.validate()?;

    let centre_locations = sample_locations(num_centres, rng)?;
    let node_locations = sample_locations(num_nodes, rng)?;

    let demands: Vec<f64> = (0..num_nodes).map(|_| config.demand.sample(rng)).collect();

    let capacities: Vec<f64> = match config.capacity {
        CapacityScheme::Uniform(range) => (0..num_centres).map(|_| range.sample(rng)).collect(),
        CapacityScheme::DemandScaled { flexibility } => {
            let total_demand: f64 = demands.iter().sum();
            let low = (total_demand / num_centres as f64).max(MIN_SCALED_CAPACITY);
            let band = ParamRange::new(low, low + flexibility * num_nodes as f64);
            (0..num_centres).map(|_| band.sample(rng)).collect()
        }
    };

    let unit_costs: Vec<f64> = (0..num_centres)
        .map(|_| config.unit_cost.sample(rng))
        .collect();

    let mut centres = Vec::with_capacity(num_centres);
    for (i, location) in centre_locations.into_iter().enumerate() {
        centres.push(ProductionCentre::new(
            CentreId::new(i),
            location,
            unit_costs[i],
            capacities[i],
        )?);
    }

    let mut nodes = Vec::with_capacity(num_nodes);
    for (j, location) in node_locations.into_iter().enumerate() {
        nodes.push(DemandNode::new(NodeId::new(j), location, demands[j])?);
    }

    Instance::new(centres, nodes)
}

/// Draw one point uniformly over the sphere's surface.
pub fn sample_location<R: Rng + ?Sized>(rng: &mut R) -> GscResult<GeoPoint> {
    let u: f64 = rng.gen_range(-1.0..=1.0);
    // asin(±1) can land a few ulps past ±90 after the degree conversion.
    let latitude = u.asin().to_degrees().clamp(-90.0, 90.0);
    let longitude: f64 = rng.gen_range(-180.0..180.0);
    GeoPoint::new(latitude, longitude)
}

fn sample_locations<R: Rng + ?Sized>(count: usize, rng: &mut R) -> GscResult<Vec<GeoPoint>> {
    (0..count).map(|_| sample_location(rng)).collect()
}
