// lumen_sim/src/simulation/vision.rs

use bevy::prelude::*;
use lumen_core::aggregator::VisionAggregator;
use lumen_core::estimation::confidence::ConfidenceModel;
use lumen_core::estimation::solver::{CoprocessorPoseEstimator, PoseSolver};
use lumen_core::io::{CameraIo, SimCameraFeed, SimulatedCamera};
use lumen_core::messages::PoseObservation;
use rand_chacha::ChaCha8Rng;
use rand_distr::NormalError;
use std::time::Duration;

use crate::simulation::app_state::SimulationSet;
use crate::simulation::config::LoadedScenario;
use crate::simulation::ground_truth::GroundTruthPose;
use crate::simulation::noise::GaussianDetectionNoise;
use crate::simulation::prng::child_rng;

// =========================================================================
// == Vision Resources & Events ==
// =========================================================================

/// The aggregator, wrapped so Bevy can own it as a resource.
#[derive(Resource)]
pub struct VisionSubsystem(pub VisionAggregator);

/// Fires once per simulated camera exposure.
#[derive(Resource)]
pub struct CameraFrameTimer(pub Timer);

/// One pose observation handed to the downstream localization filter.
#[derive(Event, Debug, Clone)]
pub struct VisionObservationEvent(pub PoseObservation);

/// Builds one simulated camera per configured mount, each with its own noise stream.
pub fn build_vision_subsystem(
    scenario: &LoadedScenario,
    rng: &mut ChaCha8Rng,
) -> Result<VisionSubsystem, NormalError> {
    let vision = &scenario.config.vision;
    let layout = scenario.layout.clone();
    let feed = SimCameraFeed::new(vision.sim_camera, layout.clone());
    let solver: Box<dyn PoseSolver> = Box::new(CoprocessorPoseEstimator::new(layout.clone()));

    let mut cameras: Vec<Box<dyn CameraIo>> = Vec::with_capacity(vision.cameras.len());
    for camera in &vision.cameras {
        let noise = GaussianDetectionNoise::new(&scenario.config.noise, child_rng(rng))?;
        cameras.push(Box::new(
            SimulatedCamera::new(
                camera.name.clone(),
                camera.mount.to_isometry(),
                feed.clone(),
                solver.clone(),
            )
            .with_noise(Box::new(noise)),
        ));
    }

    let model = ConfidenceModel::from_config(vision, layout);
    Ok(VisionSubsystem(VisionAggregator::new(cameras, Box::new(model))))
}

// =========================================================================
// == Vision Plugin ==
// =========================================================================

pub struct VisionPlugin;

impl Plugin for VisionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<VisionObservationEvent>()
            .add_systems(
                FixedUpdate,
                expose_camera_frames_system.in_set(SimulationSet::Sensors),
            )
            .add_systems(
                FixedUpdate,
                (refresh_cameras_system, publish_observations_system)
                    .chain()
                    .in_set(SimulationSet::Aggregation),
            );
    }
}

impl CameraFrameTimer {
    pub fn from_fps(fps: f64) -> Self {
        Self(Timer::new(
            Duration::from_secs_f64(1.0 / fps),
            TimerMode::Repeating,
        ))
    }
}

// =========================================================================
// == Runtime Systems ==
// =========================================================================

/// Shows the simulated cameras the true robot pose whenever a frame is due.
fn expose_camera_frames_system(
    time: Res<Time>,
    truth: Res<GroundTruthPose>,
    mut timer: ResMut<CameraFrameTimer>,
    mut vision: ResMut<VisionSubsystem>,
) {
    timer.0.tick(time.delta());
    for _ in 0..timer.0.times_finished_this_tick() {
        vision.0.inject_ground_truth(&truth.0);
    }
}

fn refresh_cameras_system(mut vision: ResMut<VisionSubsystem>) {
    vision.0.refresh();
}

fn publish_observations_system(
    vision: Res<VisionSubsystem>,
    mut writer: EventWriter<VisionObservationEvent>,
) {
    for observation in vision.0.collect_observations() {
        writer.write(VisionObservationEvent(observation));
    }
}
