// lumen_sim/src/simulation/telemetry.rs

//! Debug instrumentation: how far each published observation is from the
//! truth, and a run summary when the scenario ends.

use bevy::prelude::*;

use crate::simulation::app_state::SimulationSet;
use crate::simulation::config::ScenarioConfig;
use crate::simulation::ground_truth::GroundTruthPose;
use crate::simulation::vision::{VisionObservationEvent, VisionSubsystem};

#[derive(Resource, Debug, Default, Clone)]
pub struct VisionStats {
    pub ticks: u64,
    /// Observations with usable std devs.
    pub accepted: u64,
    /// Observations flagged as not to be trusted.
    pub distrusted: u64,
    /// Published observations per camera, in camera order.
    pub per_camera: Vec<u64>,
    /// Sum of squared planar errors of accepted observations.
    pub squared_error_sum: f64,
}

impl VisionStats {
    pub fn new(camera_count: usize) -> Self {
        Self {
            per_camera: vec![0; camera_count],
            ..Default::default()
        }
    }

    pub fn record(&mut self, camera_index: usize, distrusted: bool, planar_error: f64) {
        if let Some(count) = self.per_camera.get_mut(camera_index) {
            *count += 1;
        }
        if distrusted {
            self.distrusted += 1;
        } else {
            self.accepted += 1;
            self.squared_error_sum += planar_error * planar_error;
        }
    }

    /// Root-mean-square planar error of accepted observations.
    pub fn rms_error(&self) -> Option<f64> {
        (self.accepted > 0).then(|| (self.squared_error_sum / self.accepted as f64).sqrt())
    }
}

pub struct TelemetryPlugin;

impl Plugin for TelemetryPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (observation_error_system, end_of_run_system)
                .chain()
                .in_set(SimulationSet::Telemetry),
        );
    }
}

fn observation_error_system(
    mut reader: EventReader<VisionObservationEvent>,
    truth: Res<GroundTruthPose>,
    mut stats: ResMut<VisionStats>,
) {
    stats.ticks += 1;
    for VisionObservationEvent(observation) in reader.read() {
        let error = (observation.pose.translation.vector - truth.0.translation.vector).norm();
        let distrusted = observation.is_distrusted();
        debug!(
            "[{}] pose ({:.3}, {:.3}) error {:.3} m, std devs [{:.3}, {:.3}, {:.3}]{}",
            observation.camera_name,
            observation.pose.translation.x,
            observation.pose.translation.y,
            error,
            observation.std_devs.x,
            observation.std_devs.y,
            observation.std_devs.z,
            if distrusted { " (distrusted)" } else { "" }
        );
        stats.record(observation.camera_index, distrusted, error);
    }
}

fn end_of_run_system(
    time: Res<Time>,
    config: Res<ScenarioConfig>,
    stats: Res<VisionStats>,
    vision: Res<VisionSubsystem>,
    mut exit: EventWriter<AppExit>,
) {
    if time.elapsed_secs_f64() < config.simulation.duration_seconds {
        return;
    }

    info!(
        "Run complete after {} ticks: {} accepted, {} distrusted observations.",
        stats.ticks, stats.accepted, stats.distrusted
    );
    for (name, count) in vision.0.camera_names().zip(stats.per_camera.iter()) {
        info!("  -> '{}' published {} observations", name, count);
    }
    match stats.rms_error() {
        Some(rms) => info!("RMS planar error of accepted observations: {:.4} m", rms),
        None => warn!("No accepted observations; check camera mounts and the tag layout."),
    }
    exit.write(AppExit::Success);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn records_by_camera_and_trust() {
        let mut stats = VisionStats::new(2);
        stats.record(0, false, 0.3);
        stats.record(1, false, 0.4);
        stats.record(1, true, 9.0);
        // Out-of-range indices still count toward the totals.
        stats.record(5, false, 0.0);

        assert_eq!(stats.per_camera, vec![1, 2]);
        assert_eq!(stats.accepted, 3);
        assert_eq!(stats.distrusted, 1);
        assert_abs_diff_eq!(stats.rms_error().unwrap(), (0.25_f64 / 3.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn no_rms_without_accepted_observations() {
        let mut stats = VisionStats::new(1);
        stats.record(0, true, 3.0);
        assert!(stats.rms_error().is_none());
    }
}
