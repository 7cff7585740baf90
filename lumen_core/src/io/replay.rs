// lumen_core/src/io/replay.rs

use crate::io::CameraIo;
use crate::messages::CameraObservation;
use crate::types::Pose3;
use std::collections::VecDeque;

/// Plays back observations recorded from an earlier run, one per tick.
///
/// Once the recording runs out the camera reads as unplugged.
pub struct ReplayCamera {
    name: String,
    robot_to_camera: Pose3,
    frames: VecDeque<CameraObservation>,
}

impl ReplayCamera {
    pub fn new(
        name: impl Into<String>,
        robot_to_camera: Pose3,
        frames: impl IntoIterator<Item = CameraObservation>,
    ) -> Self {
        Self {
            name: name.into(),
            robot_to_camera,
            frames: frames.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl CameraIo for ReplayCamera {
    fn name(&self) -> &str {
        &self.name
    }

    fn robot_to_camera(&self) -> &Pose3 {
        &self.robot_to_camera
    }

    fn update_inputs(&mut self, inputs: &mut CameraObservation) {
        *inputs = self.frames.pop_front().unwrap_or_default();
        if inputs.pose.is_none() {
            inputs.timestamp_seconds = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Isometry2, Isometry3, Vector2};

    #[test]
    fn plays_frames_in_order_then_goes_dark() {
        let first = CameraObservation {
            connected: true,
            pose: Some(Isometry2::new(Vector2::new(1.0, 2.0), 0.0)),
            timestamp_seconds: 0.02,
            ..Default::default()
        };
        let second = CameraObservation {
            connected: true,
            // A recorded poseless frame whose timestamp was never reset.
            timestamp_seconds: 0.04,
            ..Default::default()
        };
        let mut camera = ReplayCamera::new("log", Isometry3::identity(), [first.clone(), second]);
        assert_eq!(camera.remaining(), 2);

        let mut inputs = CameraObservation::default();
        camera.update_inputs(&mut inputs);
        assert_eq!(inputs, first);

        camera.update_inputs(&mut inputs);
        assert!(inputs.connected);
        assert!(inputs.pose.is_none());
        assert_eq!(inputs.timestamp_seconds, 0.0);

        camera.update_inputs(&mut inputs);
        assert_eq!(inputs, CameraObservation::default());
        assert!(!inputs.connected);
    }
}
