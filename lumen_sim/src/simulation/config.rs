// lumen_sim/src/simulation/config.rs

//! Loading and validating scenario files.

use bevy::prelude::Resource;
use figment::{
    providers::{Format, Json, Toml},
    Figment,
};
use lumen_core::config::{ConfigError, VisionConfig};
use lumen_core::layout::TagLayout;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario file not found at {0:?}")]
    MissingScenario(PathBuf),
    #[error("failed to parse scenario file: {0}")]
    Scenario(#[source] figment::Error),
    #[error("tag layout file not found at {0:?}")]
    MissingLayout(PathBuf),
    #[error("failed to load tag layout from {path:?}: {source}")]
    Layout {
        path: PathBuf,
        #[source]
        source: figment::Error,
    },
    #[error("invalid vision configuration: {0}")]
    Vision(#[from] ConfigError),
    #[error("invalid detection noise: {0}")]
    Noise(#[from] rand_distr::NormalError),
    #[error("`{name}` must be finite and {requirement}, got {value}")]
    InvalidParameter {
        name: &'static str,
        requirement: &'static str,
        value: f64,
    },
}

// =========================================================================
// == Top-Level Scenario Resource ==
// =========================================================================

/// The root of the data parsed from a `scenario.toml` file.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)] // Fail if the TOML has fields not in our struct
pub struct ScenarioConfig {
    #[serde(default)]
    pub simulation: Simulation,

    #[serde(default)]
    pub vision: VisionConfig,

    pub layout: LayoutSource,

    #[serde(default)]
    pub trajectory: TrajectoryConfig,

    #[serde(default)]
    pub noise: NoiseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Simulation {
    /// Optional seed for the pseudo-random number generator for determinism.
    pub seed: Option<u64>,
    /// Duration of the simulation in seconds.
    pub duration_seconds: f64,
    /// Rate of the fixed control loop.
    pub tick_hz: f64,
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            seed: None,
            duration_seconds: 20.0,
            tick_hz: 50.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutSource {
    /// JSON layout file, relative to the scenario file unless absolute.
    pub path: PathBuf,
}

/// The robot drives a circle at constant speed, facing along its path.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrajectoryConfig {
    pub center: [f64; 2],
    pub radius: f64,
    /// Radians per second; negative drives clockwise.
    pub angular_speed: f64,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            center: [8.27, 4.1],
            radius: 2.0,
            angular_speed: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoiseConfig {
    /// Per-axis translation noise on simulated solutions, in meters.
    pub translation_stddev: f64,
    /// Per-axis rotation noise on simulated solutions, in degrees.
    pub rotation_stddev_deg: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            translation_stddev: 0.02,
            rotation_stddev_deg: 0.5,
        }
    }
}

impl ScenarioConfig {
    pub fn validate(&self) -> Result<(), ScenarioError> {
        self.vision.validate()?;

        let positive = [
            ("simulation.duration_seconds", self.simulation.duration_seconds),
            ("simulation.tick_hz", self.simulation.tick_hz),
            ("trajectory.radius", self.trajectory.radius),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ScenarioError::InvalidParameter {
                    name,
                    requirement: "positive",
                    value,
                });
            }
        }

        let non_negative = [
            ("noise.translation_stddev", self.noise.translation_stddev),
            ("noise.rotation_stddev_deg", self.noise.rotation_stddev_deg),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ScenarioError::InvalidParameter {
                    name,
                    requirement: "non-negative",
                    value,
                });
            }
        }

        if !self.trajectory.angular_speed.is_finite() {
            return Err(ScenarioError::InvalidParameter {
                name: "trajectory.angular_speed",
                requirement: "finite",
                value: self.trajectory.angular_speed,
            });
        }
        Ok(())
    }
}

// =========================================================================
// == Loading ==
// =========================================================================

/// A validated scenario together with the field layout it refers to.
#[derive(Debug, Clone)]
pub struct LoadedScenario {
    pub config: ScenarioConfig,
    pub layout: Arc<TagLayout>,
}

pub fn load_scenario(path: &Path) -> Result<LoadedScenario, ScenarioError> {
    if !path.is_file() {
        return Err(ScenarioError::MissingScenario(path.to_path_buf()));
    }

    let config: ScenarioConfig = Figment::new()
        .merge(Toml::file(path))
        .extract()
        .map_err(ScenarioError::Scenario)?;
    config.validate()?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let layout_path = resolve_relative(base, &config.layout.path);
    let layout = load_layout(&layout_path)?;

    Ok(LoadedScenario {
        config,
        layout: Arc::new(layout),
    })
}

pub fn load_layout(path: &Path) -> Result<TagLayout, ScenarioError> {
    if !path.is_file() {
        return Err(ScenarioError::MissingLayout(path.to_path_buf()));
    }
    Figment::new()
        .merge(Json::file(path))
        .extract()
        .map_err(|source| ScenarioError::Layout {
            path: path.to_path_buf(),
            source,
        })
}

fn resolve_relative(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
