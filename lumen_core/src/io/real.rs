// lumen_core/src/io/real.rs

use crate::estimation::solver::PoseSolver;
use crate::io::CameraIo;
use crate::messages::{CameraObservation, PipelineResult};
use crate::types::{to_pose2, Pose3};

/// Driver-side contract of a physical camera and its vision coprocessor.
pub trait CameraDevice: Send + Sync {
    fn is_connected(&self) -> bool;

    /// The most recent pipeline result the coprocessor published.
    fn latest_result(&mut self) -> PipelineResult;
}

/// Adapter for a camera on the real robot.
pub struct HardwareCamera {
    name: String,
    robot_to_camera: Pose3,
    device: Box<dyn CameraDevice>,
    solver: Box<dyn PoseSolver>,
}

impl HardwareCamera {
    pub fn new(
        name: impl Into<String>,
        robot_to_camera: Pose3,
        device: Box<dyn CameraDevice>,
        solver: Box<dyn PoseSolver>,
    ) -> Self {
        Self {
            name: name.into(),
            robot_to_camera,
            device,
            solver,
        }
    }
}

impl CameraIo for HardwareCamera {
    fn name(&self) -> &str {
        &self.name
    }

    fn robot_to_camera(&self) -> &Pose3 {
        &self.robot_to_camera
    }

    fn update_inputs(&mut self, inputs: &mut CameraObservation) {
        inputs.connected = self.device.is_connected();
        inputs.pipeline_result = self.device.latest_result();
        inputs.latency_millis = inputs.pipeline_result.latency_millis;

        match self
            .solver
            .update(&inputs.pipeline_result, &self.robot_to_camera)
        {
            Some(estimate) => {
                inputs.pose = Some(to_pose2(&estimate.pose));
                inputs.timestamp_seconds = estimate.timestamp_seconds;
            }
            None => inputs.clear_pose(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimation::solver::CoprocessorPoseEstimator;
    use crate::layout::TagLayout;
    use crate::messages::{Detection, MultiTagResult};
    use approx::assert_abs_diff_eq;
    use nalgebra::{Isometry2, Isometry3, Vector2};
    use std::sync::{Arc, Mutex};

    /// Hands out whatever result the test last queued.
    struct ScriptedDevice {
        connected: bool,
        next: Arc<Mutex<PipelineResult>>,
    }

    impl CameraDevice for ScriptedDevice {
        fn is_connected(&self) -> bool {
            self.connected
        }

        fn latest_result(&mut self) -> PipelineResult {
            self.next.lock().unwrap().clone()
        }
    }

    fn camera(connected: bool) -> (HardwareCamera, Arc<Mutex<PipelineResult>>) {
        let layout = Arc::new(
            TagLayout::new([(3, Isometry3::translation(5.0, 2.0, 1.0))], 16.54, 8.21).unwrap(),
        );
        let next = Arc::new(Mutex::new(PipelineResult::default()));
        let camera = HardwareCamera::new(
            "front",
            Isometry3::identity(),
            Box::new(ScriptedDevice {
                connected,
                next: next.clone(),
            }),
            Box::new(CoprocessorPoseEstimator::new(layout)),
        );
        (camera, next)
    }

    fn multi_tag_frame(timestamp: f64) -> PipelineResult {
        PipelineResult {
            targets: vec![Detection::new(3, Isometry3::translation(3.0, 0.0, 1.0))],
            multi_tag: Some(MultiTagResult {
                field_to_camera: Isometry3::translation(2.0, 2.0, 0.0),
                best_reprojection_error: 0.2,
                fiducial_ids_used: vec![3],
            }),
            latency_millis: 27.5,
            capture_timestamp_seconds: timestamp,
        }
    }

    #[test]
    fn fills_every_field_from_the_device() {
        let (mut camera, next) = camera(true);
        *next.lock().unwrap() = multi_tag_frame(10.0);

        let mut inputs = CameraObservation::default();
        camera.update_inputs(&mut inputs);

        assert!(inputs.connected);
        assert_eq!(inputs.detections().len(), 1);
        assert_abs_diff_eq!(inputs.latency_millis, 27.5);
        assert_abs_diff_eq!(inputs.timestamp_seconds, 10.0);
        let pose = inputs.pose.unwrap();
        assert_abs_diff_eq!(pose.translation.vector, Vector2::new(2.0, 2.0), epsilon = 1e-12);
    }

    #[test]
    fn clears_stale_pose_when_solver_has_nothing_new() {
        let (mut camera, next) = camera(true);
        *next.lock().unwrap() = multi_tag_frame(10.0);

        let mut inputs = CameraObservation::default();
        camera.update_inputs(&mut inputs);
        assert!(inputs.pose.is_some());

        // Same frame again: nothing new to report.
        camera.update_inputs(&mut inputs);
        assert!(inputs.pose.is_none());
        assert_eq!(inputs.timestamp_seconds, 0.0);
        // The pipeline result itself is still mirrored.
        assert_eq!(inputs.detections().len(), 1);
    }

    #[test]
    fn reports_disconnected_device() {
        let (mut camera, _next) = camera(false);
        let mut inputs = CameraObservation {
            connected: true,
            pose: Some(Isometry2::new(Vector2::new(1.0, 1.0), 0.0)),
            timestamp_seconds: 3.0,
            ..Default::default()
        };
        camera.update_inputs(&mut inputs);
        assert!(!inputs.connected);
        assert!(inputs.pose.is_none());
    }
}
