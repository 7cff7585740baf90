// lumen_core/src/io/sim.rs

use crate::config::SimCameraProperties;
use crate::estimation::solver::PoseSolver;
use crate::io::CameraIo;
use crate::layout::TagLayout;
use crate::messages::{CameraObservation, Detection, MultiTagResult, PipelineResult};
use crate::types::{to_pose2, to_pose3, Pose2, Pose3};
use nalgebra::Vector3;
use std::sync::Arc;

/// Perturbs ideal simulated geometry so the camera behaves like a real sensor.
pub trait DetectionNoise: Send + Sync {
    fn perturb(&mut self, pose: &Pose3) -> Pose3;
}

// =========================================================================
// == Simulated Camera Feed ==
// =========================================================================

/// Renders the detections an ideal camera would report from a known pose.
///
/// A tag is visible when it is in front of the lens, inside both fields of
/// view, within range, and its printed face points toward the camera.
#[derive(Debug, Clone)]
pub struct SimCameraFeed {
    properties: SimCameraProperties,
    layout: Arc<TagLayout>,
}

impl SimCameraFeed {
    pub fn new(properties: SimCameraProperties, layout: Arc<TagLayout>) -> Self {
        Self { properties, layout }
    }

    pub fn properties(&self) -> &SimCameraProperties {
        &self.properties
    }

    /// Builds the pipeline result for a frame exposed at `timestamp` from `field_to_camera`.
    pub fn render(
        &self,
        field_to_camera: &Pose3,
        timestamp: f64,
        mut noise: Option<&mut (dyn DetectionNoise + 'static)>,
    ) -> PipelineResult {
        let half_hfov = self.properties.horizontal_fov_deg.to_radians() / 2.0;
        let half_vfov = self.properties.vertical_fov_deg.to_radians() / 2.0;
        let camera_to_field = field_to_camera.inverse();

        let mut targets: Vec<Detection> = self
            .layout
            .tags()
            .filter_map(|(id, field_to_tag)| {
                let camera_to_target = camera_to_field * field_to_tag;
                let p = camera_to_target.translation.vector;
                let distance = p.norm();
                if p.x <= 0.0 || distance > self.properties.max_range {
                    return None;
                }

                let yaw = p.y.atan2(p.x);
                let pitch = p.z.atan2(p.xy().norm());
                if yaw.abs() > half_hfov || pitch.abs() > half_vfov {
                    return None;
                }

                // Tags are printed on their +X face.
                let facing = field_to_tag.rotation * Vector3::x();
                let to_camera = field_to_camera.translation.vector - field_to_tag.translation.vector;
                if facing.dot(&to_camera) <= 0.0 {
                    return None;
                }

                Some((id, camera_to_target, yaw, pitch, distance))
            })
            .map(|(id, camera_to_target, yaw, pitch, distance)| {
                let observed = match noise.as_deref_mut() {
                    Some(noise) => noise.perturb(&camera_to_target),
                    None => camera_to_target,
                };
                Detection {
                    fiducial_id: id,
                    yaw_deg: yaw.to_degrees(),
                    pitch_deg: pitch.to_degrees(),
                    area: self.image_area_percent(distance, half_hfov, half_vfov),
                    pose_ambiguity: self.ambiguity(distance),
                    best_camera_to_target: observed,
                    alt_camera_to_target: observed,
                }
            })
            .collect();

        // Largest target first, the way the coprocessor orders them.
        targets.sort_by(|a, b| b.area.total_cmp(&a.area));

        let multi_tag = if targets.len() >= 2 {
            let solved = match noise {
                Some(noise) => noise.perturb(field_to_camera),
                None => *field_to_camera,
            };
            Some(MultiTagResult {
                field_to_camera: solved,
                best_reprojection_error: 0.0,
                fiducial_ids_used: targets.iter().map(|t| t.fiducial_id).collect(),
            })
        } else {
            None
        };

        PipelineResult {
            targets,
            multi_tag,
            latency_millis: self.properties.latency_millis,
            capture_timestamp_seconds: timestamp,
        }
    }

    fn image_area_percent(&self, distance: f64, half_hfov: f64, half_vfov: f64) -> f64 {
        // Tag face area over the frustum cross-section at that distance.
        let frustum = (2.0 * distance * half_hfov.tan()) * (2.0 * distance * half_vfov.tan());
        100.0 * self.properties.tag_size.powi(2) / frustum
    }

    fn ambiguity(&self, distance: f64) -> f64 {
        0.05 + 0.25 * (distance / self.properties.max_range)
    }
}

// =========================================================================
// == Simulated Camera Adapter ==
// =========================================================================

/// Adapter for a camera that sees a simulated field.
///
/// Each ground-truth injection exposes one frame and advances the camera's
/// own clock by one frame period.
pub struct SimulatedCamera {
    name: String,
    robot_to_camera: Pose3,
    feed: SimCameraFeed,
    solver: Box<dyn PoseSolver>,
    noise: Option<Box<dyn DetectionNoise>>,
    latest: PipelineResult,
    clock_seconds: f64,
    connected: bool,
}

impl SimulatedCamera {
    pub fn new(
        name: impl Into<String>,
        robot_to_camera: Pose3,
        feed: SimCameraFeed,
        solver: Box<dyn PoseSolver>,
    ) -> Self {
        Self {
            name: name.into(),
            robot_to_camera,
            feed,
            solver,
            noise: None,
            latest: PipelineResult::default(),
            clock_seconds: 0.0,
            connected: true,
        }
    }

    pub fn with_noise(mut self, noise: Box<dyn DetectionNoise>) -> Self {
        self.noise = Some(noise);
        self
    }

    /// Simulates unplugging (or reattaching) the camera.
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    pub fn clock_seconds(&self) -> f64 {
        self.clock_seconds
    }

    /// Ground-truth field pose of the camera for a given robot pose.
    pub fn field_to_camera(&self, robot_pose: &Pose2) -> Pose3 {
        to_pose3(robot_pose) * self.robot_to_camera
    }
}

impl CameraIo for SimulatedCamera {
    fn name(&self) -> &str {
        &self.name
    }

    fn robot_to_camera(&self) -> &Pose3 {
        &self.robot_to_camera
    }

    fn update_inputs(&mut self, inputs: &mut CameraObservation) {
        inputs.connected = self.connected;
        inputs.pipeline_result = if self.connected {
            self.latest.clone()
        } else {
            PipelineResult::default()
        };
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

    fn inject_ground_truth(&mut self, robot_pose: &Pose2) {
        self.clock_seconds += self.feed.properties().frame_period_seconds();
        let field_to_camera = self.field_to_camera(robot_pose);
        self.latest = self
            .feed
            .render(&field_to_camera, self.clock_seconds, self.noise.as_deref_mut());
    }
}
