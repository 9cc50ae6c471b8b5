//! Great-circle distance on a spherical Earth.
//!
//! Uses the haversine formulation
//!
//! ```text
//! h = sin²(Δφ/2) + cos φ₁ · cos φ₂ · sin²(Δλ/2)
//! c = 2 · atan2(√h, √(1 − h))
//! d = R · c
//! ```
//!
//! which stays well conditioned for both coincident and near-antipodal points,
//! unlike the spherical law of cosines (`acos` loses digits near 0 and π).

use crate::units::{Kilometres, Radians};
use crate::GeoPoint;

/// Mean Earth radius in kilometres (IUGG R₁).
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Central angle between two points, in `[0, π]`.
pub fn central_angle(a: &GeoPoint, b: &GeoPoint) -> Radians {
    let phi1 = a.latitude().to_radians();
    let phi2 = b.latitude().to_radians();
    let d_phi = phi2 - phi1;
    let d_lambda = (b.longitude() - a.longitude()).to_radians();

    let s_phi = (d_phi.value() / 2.0).sin();
    let s_lambda = (d_lambda.value() / 2.0).sin();
    // Rounding can push h a hair outside [0, 1] for antipodes.
    let h = (s_phi * s_phi + phi1.cos() * phi2.cos() * s_lambda * s_lambda).clamp(0.0, 1.0);

    Radians(2.0 * h.sqrt().atan2((1.0 - h).sqrt()))
}

/// Great-circle distance between two points on a sphere of radius [`EARTH_RADIUS_KM`].
///
/// Identical points return exactly zero; antipodal points return `π · R`.
pub fn distance(a: &GeoPoint, b: &GeoPoint) -> Kilometres {
    Kilometres::arc(central_angle(a, b), EARTH_RADIUS_KM)
}
