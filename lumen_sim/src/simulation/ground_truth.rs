// lumen_sim/src/simulation/ground_truth.rs

use bevy::prelude::*;
use lumen_core::types::Pose2;
use nalgebra::{Isometry2, Vector2};
use std::f64::consts::FRAC_PI_2;

use crate::simulation::app_state::SimulationSet;
use crate::simulation::config::TrajectoryConfig;

/// Where the robot truly is this tick.
#[derive(Resource, Debug, Clone, Copy)]
pub struct GroundTruthPose(pub Pose2);

/// The scripted path the simulated robot follows.
#[derive(Resource, Debug, Clone, Copy)]
pub struct Trajectory(pub TrajectoryConfig);

impl Trajectory {
    /// Pose on the circle at `t` seconds, heading along the direction of travel.
    pub fn pose_at(&self, t: f64) -> Pose2 {
        let cfg = &self.0;
        let theta = cfg.angular_speed * t;
        let position = Vector2::new(
            cfg.center[0] + cfg.radius * theta.cos(),
            cfg.center[1] + cfg.radius * theta.sin(),
        );
        let heading = theta + FRAC_PI_2.copysign(cfg.angular_speed);
        Isometry2::new(position, heading)
    }
}

pub struct GroundTruthPlugin;

impl Plugin for GroundTruthPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            advance_ground_truth_system.in_set(SimulationSet::GroundTruth),
        );
    }
}

fn advance_ground_truth_system(
    time: Res<Time>,
    trajectory: Res<Trajectory>,
    mut truth: ResMut<GroundTruthPose>,
) {
    truth.0 = trajectory.pose_at(time.elapsed_secs_f64());
}
