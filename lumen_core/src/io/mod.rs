// lumen_core/src/io/mod.rs

//! Camera result adapters. Every camera source, physical, simulated or
//! replayed, fills the same `CameraObservation` so the aggregator never needs
//! to know which one it is talking to.

use crate::messages::CameraObservation;
use crate::types::{Pose2, Pose3};

// --- CAMERA IO TRAIT ---
pub trait CameraIo: Send + Sync {
    fn name(&self) -> &str;

    /// Transform from the robot origin to the camera.
    fn robot_to_camera(&self) -> &Pose3;

    /// Overwrites `inputs` with this tick's result.
    ///
    /// Implementations must write every field. When no estimate is available
    /// the pose is cleared, never left over from an earlier tick.
    fn update_inputs(&mut self, inputs: &mut CameraObservation);

    /// Tells a simulated camera where the robot truly is. Other sources ignore it.
    fn inject_ground_truth(&mut self, _robot_pose: &Pose2) {}
}

pub mod real;
pub mod replay;
pub mod sim;

pub use real::{CameraDevice, HardwareCamera};
pub use replay::ReplayCamera;
pub use sim::{DetectionNoise, SimCameraFeed, SimulatedCamera};
