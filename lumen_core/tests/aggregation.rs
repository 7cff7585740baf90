// lumen_core/tests/aggregation.rs

use approx::assert_relative_eq;
use lumen_core::prelude::*;
use nalgebra::{Isometry2, Isometry3, Translation3, UnitQuaternion, Vector2, Vector3};
use std::f64::consts::PI;
use std::sync::Arc;

fn layout() -> Arc<TagLayout> {
    Arc::new(
        TagLayout::new(
            [
                (1, Isometry3::translation(1.0, 0.0, 1.2)),
                (2, Isometry3::translation(0.0, 1.5, 1.2)),
                (7, Isometry3::translation(3.0, 3.0, 1.2)),
            ],
            16.54,
            8.21,
        )
        .unwrap(),
    )
}

fn observation(connected: bool, pose: Option<Pose2>, ids: &[FiducialId]) -> CameraObservation {
    CameraObservation {
        connected,
        pipeline_result: PipelineResult {
            targets: ids
                .iter()
                .map(|&id| Detection::new(id, Isometry3::identity()))
                .collect(),
            latency_millis: 30.0,
            ..Default::default()
        },
        latency_millis: 30.0,
        pose,
        timestamp_seconds: if pose.is_some() { 12.25 } else { 0.0 },
    }
}

fn replay(name: &str, frame: CameraObservation) -> Box<dyn CameraIo> {
    Box::new(ReplayCamera::new(name, Isometry3::identity(), [frame]))
}

#[test]
fn three_camera_cycle_emits_only_the_usable_estimate() {
    let layout = layout();
    let config = VisionConfig::default();
    let model = ConfidenceModel::from_config(&config, layout);
    let origin = Isometry2::new(Vector2::zeros(), 0.0);

    let mut aggregator = VisionAggregator::new(
        vec![
            replay("cam0", observation(false, Some(origin), &[1, 2])),
            replay("cam1", observation(true, Some(origin), &[1, 2])),
            replay("cam2", observation(true, None, &[1])),
        ],
        Box::new(model),
    );
    aggregator.refresh();

    let observations = aggregator.collect_observations();
    assert_eq!(observations.len(), 1);

    let only = &observations[0];
    assert_eq!(only.camera_index, 1);
    assert_eq!(only.camera_name, "cam1");
    assert_eq!(only.timestamp_seconds, 12.25);
    assert!(!only.is_distrusted());
    assert_relative_eq!(
        only.std_devs,
        Vector3::new(0.5, 0.5, 1.0) * (1.0 + 1.25 * 1.25 / 30.0),
        epsilon = 1e-12
    );
}

#[test]
fn shared_tag_resolves_to_last_camera() {
    let mut first = observation(true, None, &[7]);
    first.pipeline_result.targets[0].area = 1.0;
    let mut second = observation(true, None, &[7]);
    second.pipeline_result.targets[0].area = 2.0;

    let mut aggregator = VisionAggregator::new(
        vec![replay("left", first), replay("right", second)],
        Box::new(ConfidenceModel::from_config(&VisionConfig::default(), layout())),
    );
    aggregator.refresh();

    let found = aggregator.find_detection(7).unwrap();
    assert_eq!(found.area, 2.0);
}

#[test]
fn lone_distant_tag_is_published_but_distrusted() {
    let origin = Isometry2::new(Vector2::zeros(), 0.0);
    let mut aggregator = VisionAggregator::new(
        vec![replay("cam", observation(true, Some(origin), &[7]))],
        Box::new(ConfidenceModel::from_config(&VisionConfig::default(), layout())),
    );
    aggregator.refresh();

    let observations = aggregator.collect_observations();
    assert_eq!(observations.len(), 1);
    assert!(observations[0].is_distrusted());
    assert_eq!(observations[0].std_devs, DISTRUST_STD_DEVS);
}

#[test]
fn simulated_cameras_track_injected_truth() {
    // A wall of tags ahead of the robot, all facing back toward it.
    let facing_back = UnitQuaternion::from_euler_angles(0.0, 0.0, PI);
    let wall = Arc::new(
        TagLayout::new(
            (0..4).map(|i| {
                (
                    10 + i,
                    Isometry3::from_parts(
                        Translation3::new(3.0, -0.75 + 0.5 * i as f64, 0.4),
                        facing_back,
                    ),
                )
            }),
            16.54,
            8.21,
        )
        .unwrap(),
    );
    let config = VisionConfig::default();
    let solver: Box<dyn PoseSolver> = Box::new(CoprocessorPoseEstimator::new(wall.clone()));
    let feed = SimCameraFeed::new(config.sim_camera, wall.clone());

    let cameras: Vec<Box<dyn CameraIo>> = vec![
        Box::new(SimulatedCamera::new(
            "forward",
            Isometry3::translation(0.2, 0.0, 0.4),
            feed.clone(),
            solver.clone(),
        )),
        Box::new(SimulatedCamera::new(
            "rearward",
            Isometry3::from_parts(
                Translation3::new(-0.2, 0.0, 0.4),
                UnitQuaternion::from_euler_angles(0.0, 0.0, PI),
            ),
            feed,
            solver,
        )),
    ];
    let mut aggregator = VisionAggregator::new(
        cameras,
        Box::new(ConfidenceModel::from_config(&config, wall)),
    );

    let truth = Isometry2::new(Vector2::new(0.4, 0.1), 0.02);
    aggregator.inject_ground_truth(&truth);
    aggregator.refresh();

    let observations = aggregator.collect_observations();
    assert_eq!(observations.len(), 1);
    assert_eq!(observations[0].camera_name, "forward");
    assert_relative_eq!(
        observations[0].pose.translation.vector,
        truth.translation.vector,
        epsilon = 1e-9
    );
    // Four tags resolved: the multi-tag preset applies.
    assert!(observations[0].std_devs.x < 0.5 * 2.0);

    // The rear camera still reports in, just without a pose.
    assert!(aggregator.observations()[1].connected);
    assert!(aggregator.observations()[1].pose.is_none());

    // Without a new frame the next tick has nothing to publish.
    aggregator.refresh();
    assert!(aggregator.collect_observations().is_empty());
}
