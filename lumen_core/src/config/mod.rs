// lumen_core/src/config/mod.rs

//! Static vision configuration: std-dev presets, confidence tuning, camera
//! mounts and simulated camera properties. Built once at startup, validated,
//! then shared read-only with the aggregator and the confidence model.

pub mod serde_helpers;

use crate::types::{Pose3, StdDevs};
use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{preset} std dev component {index} must be finite and positive, got {value}")]
    InvalidStdDev {
        preset: &'static str,
        index: usize,
        value: f64,
    },
    #[error("multi-tag std devs must be tighter than single-tag std devs in every component")]
    MultiTagNotTighter,
    #[error("confidence parameter `{name}` must be finite and positive, got {value}")]
    InvalidTuning { name: &'static str, value: f64 },
    #[error("simulated camera property `{name}` must be finite and positive, got {value}")]
    InvalidSimProperty { name: &'static str, value: f64 },
    #[error("at least one camera must be configured")]
    NoCameras,
    #[error("camera name '{0}' is configured more than once")]
    DuplicateCamera(String),
}

// =========================================================================
// == Top-Level Configuration ==
// =========================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VisionConfig {
    #[serde(default)]
    pub std_devs: StdDevPresets,

    #[serde(default)]
    pub confidence: ConfidenceTuning,

    #[serde(default = "default_cameras")]
    pub cameras: Vec<CameraConfig>,

    #[serde(default)]
    pub sim_camera: SimCameraProperties,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            std_devs: StdDevPresets::default(),
            confidence: ConfidenceTuning::default(),
            cameras: default_cameras(),
            sim_camera: SimCameraProperties::default(),
        }
    }
}

impl VisionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.std_devs.validate()?;
        self.confidence.validate()?;
        self.sim_camera.validate()?;

        if self.cameras.is_empty() {
            return Err(ConfigError::NoCameras);
        }
        let mut seen = HashSet::new();
        for camera in &self.cameras {
            if !seen.insert(camera.name.as_str()) {
                return Err(ConfigError::DuplicateCamera(camera.name.clone()));
            }
        }
        Ok(())
    }
}

// =========================================================================
// == Confidence Model Parameters ==
// =========================================================================

/// Baseline standard deviations of a vision pose estimate, before distance scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StdDevPresets {
    #[serde(with = "serde_helpers::vec3_from_array")]
    pub single_tag: StdDevs,
    #[serde(with = "serde_helpers::vec3_from_array")]
    pub multi_tag: StdDevs,
}

impl Default for StdDevPresets {
    fn default() -> Self {
        // Untuned starting points; measure estimation noise on the real robot.
        Self {
            single_tag: Vector3::new(4.0, 4.0, 8.0),
            multi_tag: Vector3::new(0.5, 0.5, 1.0),
        }
    }
}

impl StdDevPresets {
    fn validate(&self) -> Result<(), ConfigError> {
        for (preset, values) in [("single_tag", &self.single_tag), ("multi_tag", &self.multi_tag)] {
            for (index, &value) in values.iter().enumerate() {
                if !value.is_finite() || value <= 0.0 {
                    return Err(ConfigError::InvalidStdDev {
                        preset,
                        index,
                        value,
                    });
                }
            }
        }
        if self
            .multi_tag
            .iter()
            .zip(self.single_tag.iter())
            .any(|(multi, single)| multi >= single)
        {
            return Err(ConfigError::MultiTagNotTighter);
        }
        Ok(())
    }
}

/// Empirically tuned constants of the distance penalty. Tunable, not structural.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfidenceTuning {
    /// Beyond this mean distance (meters) a lone tag is not trusted at all.
    pub max_single_tag_distance: f64,
    /// Std devs are scaled by `1 + d² / distance_scale`.
    pub distance_scale: f64,
}

impl Default for ConfidenceTuning {
    fn default() -> Self {
        Self {
            max_single_tag_distance: 4.0,
            distance_scale: 30.0,
        }
    }
}

impl ConfidenceTuning {
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("max_single_tag_distance", self.max_single_tag_distance),
            ("distance_scale", self.distance_scale),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidTuning { name, value });
            }
        }
        Ok(())
    }
}

// =========================================================================
// == Cameras ==
// =========================================================================

/// Where a camera sits on the robot, relative to the robot origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Mount {
    #[serde(with = "serde_helpers::vec3_from_array", default)]
    pub translation: Vector3<f64>,

    /// Roll, pitch, yaw in degrees.
    #[serde(with = "serde_helpers::quat_from_euler_deg", default)]
    pub rotation: UnitQuaternion<f64>,
}

impl Mount {
    pub fn new(translation: Vector3<f64>, roll: f64, pitch: f64, yaw: f64) -> Self {
        Self {
            translation,
            rotation: UnitQuaternion::from_euler_angles(roll, pitch, yaw),
        }
    }

    pub fn to_isometry(&self) -> Pose3 {
        Isometry3::from_parts(Translation3::from(self.translation), self.rotation)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CameraConfig {
    pub name: String,
    /// Robot-to-camera transform.
    #[serde(default)]
    pub mount: Mount,
}

fn default_cameras() -> Vec<CameraConfig> {
    // Four arducams, a foot out from center on each side, tilted 20 degrees.
    let tilt = 20.0_f64.to_radians();
    let offset = 0.3048;
    let height = 0.12065;
    let camera = |name: &str, x: f64, y: f64, yaw: f64| CameraConfig {
        name: name.to_string(),
        mount: Mount::new(Vector3::new(x, y, height), 0.0, tilt, yaw),
    };
    vec![
        camera("front_arducam", offset, 0.0, 0.0),
        camera("back_arducam", -offset, 0.0, std::f64::consts::PI),
        camera("left_arducam", 0.0, -offset, std::f64::consts::FRAC_PI_2),
        camera("right_arducam", 0.0, offset, -std::f64::consts::FRAC_PI_2),
    ]
}

/// Optics and timing of simulated cameras.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimCameraProperties {
    pub horizontal_fov_deg: f64,
    pub vertical_fov_deg: f64,
    /// Tags farther than this (meters) are never detected.
    pub max_range: f64,
    pub fps: f64,
    pub latency_millis: f64,
    /// Physical edge length of a tag, used to fake the image area.
    pub tag_size: f64,
}

impl Default for SimCameraProperties {
    fn default() -> Self {
        Self {
            horizontal_fov_deg: 70.0,
            vertical_fov_deg: 56.0,
            max_range: 8.0,
            fps: 30.0,
            latency_millis: 35.0,
            tag_size: 0.1651,
        }
    }
}

impl SimCameraProperties {
    pub fn frame_period_seconds(&self) -> f64 {
        1.0 / self.fps
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("horizontal_fov_deg", self.horizontal_fov_deg),
            ("vertical_fov_deg", self.vertical_fov_deg),
            ("max_range", self.max_range),
            ("fps", self.fps),
            ("tag_size", self.tag_size),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidSimProperty { name, value });
            }
        }
        if !self.latency_millis.is_finite() || self.latency_millis < 0.0 {
            return Err(ConfigError::InvalidSimProperty {
                name: "latency_millis",
                value: self.latency_millis,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn defaults_match_robot_constants() {
        let config = VisionConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.std_devs.single_tag, Vector3::new(4.0, 4.0, 8.0));
        assert_eq!(config.std_devs.multi_tag, Vector3::new(0.5, 0.5, 1.0));
        assert_eq!(config.confidence.max_single_tag_distance, 4.0);
        assert_eq!(config.confidence.distance_scale, 30.0);
        assert_eq!(config.cameras.len(), 4);

        let front = config.cameras[0].mount.to_isometry();
        assert_abs_diff_eq!(front.translation.x, 0.3048);
        assert_abs_diff_eq!(front.translation.z, 0.12065);
        let (_, pitch, _) = front.rotation.euler_angles();
        assert_abs_diff_eq!(pitch, 20.0_f64.to_radians(), epsilon = 1e-9);
    }

    #[test]
    fn rejects_empty_camera_list() {
        let config = VisionConfig {
            cameras: Vec::new(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoCameras));
    }

    #[test]
    fn rejects_loose_multi_tag_preset() {
        let mut config = VisionConfig::default();
        config.std_devs.multi_tag = Vector3::new(0.5, 4.0, 1.0);
        assert_eq!(config.validate(), Err(ConfigError::MultiTagNotTighter));
    }

    #[test]
    fn rejects_non_finite_std_dev() {
        let mut config = VisionConfig::default();
        config.std_devs.single_tag.z = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidStdDev {
                preset: "single_tag",
                index: 2,
                ..
            })
        ));
    }

    #[test]
    fn rejects_duplicate_camera_names() {
        let mut cameras = default_cameras();
        cameras[1].name = cameras[0].name.clone();
        let config = VisionConfig {
            cameras,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateCamera("front_arducam".to_string()))
        );
    }

    #[test]
    fn rejects_zero_distance_scale() {
        let mut config = VisionConfig::default();
        config.confidence.distance_scale = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTuning {
                name: "distance_scale",
                ..
            })
        ));
    }
}
