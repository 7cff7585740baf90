// lumen_core/src/estimation/solver.rs

use crate::layout::TagLayout;
use crate::messages::PipelineResult;
use crate::types::{FiducialId, Pose3};
use dyn_clone::DynClone;
use serde::Serialize;
use std::fmt::Debug;
use std::sync::Arc;

/// Two results closer together than this are the same camera frame.
const SAME_FRAME_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PoseStrategy {
    /// The coprocessor solved the camera pose from all visible tags together.
    MultiTag,
    /// Fallback: the single detection with the smallest pose ambiguity.
    LowestAmbiguity,
}

/// A field-relative robot pose produced by a camera's pose solver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimatedPose {
    pub pose: Pose3,
    pub timestamp_seconds: f64,
    pub strategy: PoseStrategy,
    pub targets_used: Vec<FiducialId>,
}

// --- POSE SOLVER TRAIT ---
// The per-camera estimator that turns a pipeline result into a robot pose.
pub trait PoseSolver: DynClone + Debug + Send + Sync {
    /// Consumes the latest pipeline result of a camera mounted at `robot_to_camera`.
    /// Returns `None` when this result yields no new estimate.
    fn update(&mut self, result: &PipelineResult, robot_to_camera: &Pose3) -> Option<EstimatedPose>;
}

dyn_clone::clone_trait_object!(PoseSolver);

/// Re-expresses what the camera coprocessor already solved as a robot pose.
///
/// Prefers the coprocessor's multi-tag solution and falls back to the least
/// ambiguous single tag. A frame is only ever turned into one estimate.
#[derive(Debug, Clone)]
pub struct CoprocessorPoseEstimator {
    layout: Arc<TagLayout>,
    last_timestamp: Option<f64>,
}

impl CoprocessorPoseEstimator {
    pub fn new(layout: Arc<TagLayout>) -> Self {
        Self {
            layout,
            last_timestamp: None,
        }
    }

    fn lowest_ambiguity(
        &self,
        result: &PipelineResult,
        robot_to_camera: &Pose3,
    ) -> Option<EstimatedPose> {
        let best = result
            .targets
            .iter()
            .filter(|t| t.pose_ambiguity >= 0.0)
            .filter_map(|t| self.layout.pose_of(t.fiducial_id).map(|tag| (t, tag)))
            .min_by(|(a, _), (b, _)| a.pose_ambiguity.total_cmp(&b.pose_ambiguity))?;

        let (target, field_to_tag) = best;
        let field_to_camera = field_to_tag * target.best_camera_to_target.inverse();
        Some(EstimatedPose {
            pose: field_to_camera * robot_to_camera.inverse(),
            timestamp_seconds: result.capture_timestamp_seconds,
            strategy: PoseStrategy::LowestAmbiguity,
            targets_used: vec![target.fiducial_id],
        })
    }
}

impl PoseSolver for CoprocessorPoseEstimator {
    fn update(&mut self, result: &PipelineResult, robot_to_camera: &Pose3) -> Option<EstimatedPose> {
        if !result.has_targets() {
            return None;
        }

        let timestamp = result.capture_timestamp_seconds;
        if let Some(last) = self.last_timestamp {
            if (last - timestamp).abs() < SAME_FRAME_EPSILON {
                return None;
            }
        }
        self.last_timestamp = Some(timestamp);

        match &result.multi_tag {
            Some(multi) => Some(EstimatedPose {
                pose: multi.field_to_camera * robot_to_camera.inverse(),
                timestamp_seconds: timestamp,
                strategy: PoseStrategy::MultiTag,
                targets_used: multi.fiducial_ids_used.clone(),
            }),
            None => self.lowest_ambiguity(result, robot_to_camera),
        }
    }
}
