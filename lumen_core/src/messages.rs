// lumen_core/src/messages.rs

use crate::types::{FiducialId, Pose2, Pose3, StdDevs};
use serde::{Deserialize, Serialize};

// =========================================================================
// == Camera Pipeline Data Structures ==
// =========================================================================

/// A single fiducial seen by one camera in one frame.
///
/// Only `fiducial_id` is interpreted by the aggregation layer; the geometric
/// fields are carried for the pose solver and for telemetry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub fiducial_id: FiducialId,
    /// Horizontal angle to the target center, positive to the left.
    pub yaw_deg: f64,
    /// Vertical angle to the target center, positive up.
    pub pitch_deg: f64,
    /// Fraction of the image covered by the target, in percent.
    pub area: f64,
    /// Ratio of reprojection errors between the two PnP solutions. -1 when unknown.
    pub pose_ambiguity: f64,
    /// The lower-error solution for the target, expressed in the camera frame.
    pub best_camera_to_target: Pose3,
    /// The alternate solution for the target, expressed in the camera frame.
    pub alt_camera_to_target: Pose3,
}

impl Detection {
    /// A detection carrying only an ID and the camera-relative target pose.
    pub fn new(fiducial_id: FiducialId, camera_to_target: Pose3) -> Self {
        Self {
            fiducial_id,
            yaw_deg: 0.0,
            pitch_deg: 0.0,
            area: 0.0,
            pose_ambiguity: -1.0,
            best_camera_to_target: camera_to_target,
            alt_camera_to_target: camera_to_target,
        }
    }
}

/// A field-relative camera pose solved on the coprocessor from every visible tag at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiTagResult {
    pub field_to_camera: Pose3,
    pub best_reprojection_error: f64,
    pub fiducial_ids_used: Vec<FiducialId>,
}

/// Everything one camera pipeline reported for a single frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PipelineResult {
    pub targets: Vec<Detection>,
    pub multi_tag: Option<MultiTagResult>,
    pub latency_millis: f64,
    /// When the frame was exposed, in seconds on the robot clock.
    pub capture_timestamp_seconds: f64,
}

impl PipelineResult {
    pub fn has_targets(&self) -> bool {
        !self.targets.is_empty()
    }
}

// =========================================================================
// == Per-Cycle Records ==
// =========================================================================

/// The normalized, per-tick output of one camera adapter.
///
/// `pose` is `Some` exactly when the adapter produced an estimate this tick.
/// When it is `None`, `timestamp_seconds` is zero and carries no meaning.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CameraObservation {
    pub connected: bool,
    pub pipeline_result: PipelineResult,
    pub latency_millis: f64,
    pub pose: Option<Pose2>,
    pub timestamp_seconds: f64,
}

impl CameraObservation {
    pub fn detections(&self) -> &[Detection] {
        &self.pipeline_result.targets
    }

    /// Clears the estimate so that no pose from an earlier tick survives.
    pub fn clear_pose(&mut self) {
        self.pose = None;
        self.timestamp_seconds = 0.0;
    }
}

// =========================================================================
// == Public API Messages ==
// =========================================================================

/// The primary output of the aggregator, consumed by the localization filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoseObservation {
    pub pose: Pose2,
    pub std_devs: StdDevs,
    pub timestamp_seconds: f64,
    /// Index of the source camera in configuration order.
    pub camera_index: usize,
    pub camera_name: String,
}

impl PoseObservation {
    /// True when the confidence model flagged this observation as not to be trusted.
    pub fn is_distrusted(&self) -> bool {
        self.std_devs.iter().all(|s| *s == f64::MAX)
    }
}
