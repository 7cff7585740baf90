// lumen_core/src/aggregator.rs

use crate::estimation::UncertaintyModel;
use crate::io::CameraIo;
use crate::messages::{CameraObservation, Detection, PoseObservation};
use crate::types::{FiducialId, Pose2};
use tracing::debug;

/// Collects every camera's latest estimate once per control tick and attaches
/// the uncertainty the fusion filter should assume for it.
///
/// Camera order is fixed at construction and is the order of all outputs.
pub struct VisionAggregator {
    cameras: Vec<Box<dyn CameraIo>>,
    inputs: Vec<CameraObservation>,
    model: Box<dyn UncertaintyModel>,
}

impl VisionAggregator {
    pub fn new(cameras: Vec<Box<dyn CameraIo>>, model: Box<dyn UncertaintyModel>) -> Self {
        let inputs = vec![CameraObservation::default(); cameras.len()];
        Self {
            cameras,
            inputs,
            model,
        }
    }

    /// Pulls a fresh observation from every camera. Call once per tick, before aggregating.
    pub fn refresh(&mut self) {
        for (camera, inputs) in self.cameras.iter_mut().zip(self.inputs.iter_mut()) {
            camera.update_inputs(inputs);
            debug!(
                camera = camera.name(),
                connected = inputs.connected,
                targets = inputs.detections().len(),
                latency_ms = inputs.latency_millis,
                has_pose = inputs.pose.is_some(),
                timestamp = inputs.timestamp_seconds,
                "camera inputs"
            );
        }
    }

    /// One observation per connected camera that produced a pose this tick,
    /// in camera order. Does not mutate state, so repeated calls agree.
    pub fn collect_observations(&self) -> Vec<PoseObservation> {
        self.cameras
            .iter()
            .zip(self.inputs.iter())
            .enumerate()
            .filter(|(_, (_, inputs))| inputs.connected)
            .filter_map(|(index, (camera, inputs))| {
                let pose = inputs.pose?;
                Some(PoseObservation {
                    pose,
                    std_devs: self.model.estimate_std_devs(&pose, inputs.detections()),
                    timestamp_seconds: inputs.timestamp_seconds,
                    camera_index: index,
                    camera_name: camera.name().to_string(),
                })
            })
            .collect()
    }

    /// The most recent sighting of `fiducial_id` across all cameras.
    ///
    /// When several cameras see the same tag, the one latest in camera order wins.
    pub fn find_detection(&self, fiducial_id: FiducialId) -> Option<&Detection> {
        self.inputs
            .iter()
            .flat_map(|inputs| inputs.detections())
            .filter(|d| d.fiducial_id == fiducial_id)
            .last()
    }

    /// Forwards the robot's true pose to every simulated camera.
    pub fn inject_ground_truth(&mut self, robot_pose: &Pose2) {
        for camera in &mut self.cameras {
            camera.inject_ground_truth(robot_pose);
        }
    }

    /// This tick's raw per-camera inputs, in camera order.
    pub fn observations(&self) -> &[CameraObservation] {
        &self.inputs
    }

    pub fn camera_names(&self) -> impl Iterator<Item = &str> {
        self.cameras.iter().map(|c| c.name())
    }

    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }
}
