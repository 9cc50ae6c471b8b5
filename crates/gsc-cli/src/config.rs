//! TOML configuration for the `gsc` binary.
//!
//! Looked up at `--config PATH`, else `<config dir>/gsc/gsc.toml`; a missing
//! default file means built-in defaults. Every field is optional.

use anyhow::{anyhow, Context, Result};
use gsc_algo::solver::SolverConfig;
use gsc_algo::{CapacityScheme, GeneratorConfig, ParamRange};
use gsc_core::CostParams;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GscConfig {
    #[serde(default)]
    pub generator: GeneratorSettings,
    #[serde(default)]
    pub solver: SolverSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Ranges for random instances
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratorSettings {
    #[serde(default = "default_unit_cost")]
    pub unit_cost: [f64; 2],
    #[serde(default = "default_capacity")]
    pub capacity: [f64; 2],
    #[serde(default = "default_demand")]
    pub demand: [f64; 2],
    /// Cost per unit shipped per km
    #[serde(default = "default_distance_rate")]
    pub distance_rate: f64,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            unit_cost: default_unit_cost(),
            capacity: default_capacity(),
            demand: default_demand(),
            distance_rate: default_distance_rate(),
        }
    }
}

fn default_unit_cost() -> [f64; 2] {
    [0.5, 2.0]
}

fn default_capacity() -> [f64; 2] {
    [50.0, 150.0]
}

fn default_demand() -> [f64; 2] {
    [0.0, 10.0]
}

fn default_distance_rate() -> f64 {
    0.001
}

impl GeneratorSettings {
    /// Generator ranges, with capacities scaled to demand when `demand_scaled` is set.
    pub fn generator_config(&self, demand_scaled: Option<f64>) -> GeneratorConfig {
        let capacity = match demand_scaled {
            Some(flexibility) => CapacityScheme::DemandScaled { flexibility },
            None => CapacityScheme::Uniform(range(self.capacity)),
        };
        GeneratorConfig {
            unit_cost: range(self.unit_cost),
            capacity,
            demand: range(self.demand),
        }
    }

    pub fn cost_params(&self, distance_rate: Option<f64>) -> CostParams {
        CostParams {
            distance_rate: distance_rate.unwrap_or(self.distance_rate),
        }
    }
}

fn range([min, max]: [f64; 2]) -> ParamRange {
    ParamRange::new(min, max)
}

/// Solver defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolverSettings {
    /// Backend id
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Engine timeout in seconds (0 = no timeout)
    #[serde(default)]
    pub timeout_seconds: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            tolerance: default_tolerance(),
            timeout_seconds: 0.0,
        }
    }
}

fn default_backend() -> String {
    "clarabel".to_string()
}

fn default_tolerance() -> f64 {
    1e-6
}

impl SolverSettings {
    /// Merge command-line overrides into a solver config.
    pub fn solver_config(&self, tolerance: Option<f64>, timeout: Option<f64>) -> Result<SolverConfig> {
        let seconds = timeout.unwrap_or(self.timeout_seconds);
        let timeout = if seconds == 0.0 {
            None
        } else {
            Some(
                Duration::try_from_secs_f64(seconds)
                    .map_err(|_| anyhow!("timeout must be a non-negative number of seconds, got {seconds}"))?,
            )
        };
        Ok(SolverConfig {
            tolerance: tolerance.unwrap_or(self.tolerance),
            timeout,
        })
    }

    pub fn backend<'a>(&'a self, cli: Option<&'a str>) -> &'a str {
        cli.unwrap_or(&self.backend)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl LoggingConfig {
    pub fn level(&self) -> Result<tracing::Level> {
        self.level
            .parse()
            .map_err(|_| anyhow!("invalid log level '{}' in config", self.level))
    }
}

/// Default location: `<config dir>/gsc/gsc.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("gsc").join("gsc.toml"))
}

/// Load from `explicit` (which must exist) or the default path (which may not).
pub fn load_config(explicit: Option<&Path>) -> Result<GscConfig> {
    match explicit {
        Some(path) => read_config(path),
        None => match default_config_path() {
            Some(path) if path.exists() => read_config(&path),
            _ => Ok(GscConfig::default()),
        },
    }
}

fn read_config(path: &Path) -> Result<GscConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file '{}'", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("parsing config file '{}'", path.display()))
}
