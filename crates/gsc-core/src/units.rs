//! Unit newtypes for angles and surface distances.
//!
//! Coordinates are stored and serialized in degrees, trigonometry runs in
//! radians, and great-circle lengths come out in kilometres. Keeping the three
//! apart at the type level stops a degree value from reaching `sin` directly.
//!
//! ```
//! use gsc_core::units::{Degrees, Kilometres};
//!
//! let half_turn = Degrees(180.0).to_radians();
//! assert!((half_turn.value() - std::f64::consts::PI).abs() < 1e-12);
//!
//! let leg = Kilometres(120.0) + Kilometres(30.0);
//! assert_eq!(leg.value(), 150.0);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// Declares a transparent `f64` quantity with linear arithmetic.
macro_rules! quantity {
    ($(#[$meta:meta])* $name:ident, $symbol:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub f64);

        impl $name {
            pub const ZERO: Self = Self(0.0);

            #[inline]
            pub const fn value(self) -> f64 {
                self.0
            }
        }

        impl Add for $name {
            type Output = Self;
            #[inline]
            fn add(self, other: Self) -> Self {
                Self(self.0 + other.0)
            }
        }

        impl Sub for $name {
            type Output = Self;
            #[inline]
            fn sub(self, other: Self) -> Self {
                Self(self.0 - other.0)
            }
        }

        impl Mul<f64> for $name {
            type Output = Self;
            #[inline]
            fn mul(self, factor: f64) -> Self {
                Self(self.0 * factor)
            }
        }

        impl std::iter::Sum for $name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self::ZERO, |acc, x| acc + x)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:.4} {}", self.0, $symbol)
            }
        }
    };
}

quantity!(
    /// Angle in radians
    Radians,
    "rad"
);

quantity!(
    /// Angle in degrees (latitude/longitude storage unit)
    Degrees,
    "°"
);

quantity!(
    /// Distance along the sphere surface
    Kilometres,
    "km"
);

impl Radians {
    #[inline]
    pub fn to_degrees(self) -> Degrees {
        Degrees(self.0.to_degrees())
    }

    #[inline]
    pub fn sin(self) -> f64 {
        self.0.sin()
    }

    #[inline]
    pub fn cos(self) -> f64 {
        self.0.cos()
    }
}

impl Degrees {
    #[inline]
    pub fn to_radians(self) -> Radians {
        Radians(self.0.to_radians())
    }
}

impl Kilometres {
    /// Arc length subtending `angle` on a sphere of `radius_km`.
    #[inline]
    pub fn arc(angle: Radians, radius_km: f64) -> Self {
        Self(angle.0 * radius_km)
    }
}
