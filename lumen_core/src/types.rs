// lumen_core/src/types.rs

use nalgebra::{Isometry2, Isometry3, Translation3, UnitQuaternion, Vector2, Vector3};

// --- Core Type Aliases ---
/// Identifier printed on a fiducial marker.
pub type FiducialId = i32;

/// Planar robot pose on the field: (x, y, heading).
pub type Pose2 = Isometry2<f64>;

/// Full 6-DoF pose on the field or in a camera frame.
pub type Pose3 = Isometry3<f64>;

/// Standard deviations of a planar pose estimate: (σx, σy, σheading).
pub type StdDevs = Vector3<f64>;

/// Projects a 3-D pose onto the field plane, keeping x, y and the yaw about +Z.
pub fn to_pose2(pose: &Pose3) -> Pose2 {
    let (_, _, yaw) = pose.rotation.euler_angles();
    Isometry2::new(
        Vector2::new(pose.translation.x, pose.translation.y),
        yaw,
    )
}

/// Lifts a planar pose into 3-D with zero height, roll and pitch.
pub fn to_pose3(pose: &Pose2) -> Pose3 {
    Isometry3::from_parts(
        Translation3::new(pose.translation.x, pose.translation.y, 0.0),
        UnitQuaternion::from_euler_angles(0.0, 0.0, pose.rotation.angle()),
    )
}

/// Distance between a planar pose and a 3-D pose, measured on the field plane.
pub fn planar_distance(pose: &Pose2, other: &Pose3) -> f64 {
    (other.translation.vector.xy() - pose.translation.vector).norm()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn projection_keeps_yaw_and_drops_height() {
        let pose = Isometry3::from_parts(
            Translation3::new(1.0, -2.0, 0.7),
            UnitQuaternion::from_euler_angles(0.0, 0.3, FRAC_PI_2),
        );
        let flat = to_pose2(&pose);
        assert_abs_diff_eq!(flat.translation.x, 1.0);
        assert_abs_diff_eq!(flat.translation.y, -2.0);
        assert_abs_diff_eq!(flat.rotation.angle(), FRAC_PI_2, epsilon = 1e-9);
    }

    #[test]
    fn lift_then_project_is_identity() {
        let pose = Isometry2::new(Vector2::new(3.5, 1.25), -0.8);
        let back = to_pose2(&to_pose3(&pose));
        assert_abs_diff_eq!(back.translation.vector, pose.translation.vector, epsilon = 1e-12);
        assert_abs_diff_eq!(back.rotation.angle(), pose.rotation.angle(), epsilon = 1e-12);
    }

    #[test]
    fn planar_distance_ignores_height() {
        let pose = Isometry2::new(Vector2::new(0.0, 0.0), 0.0);
        let tag = Isometry3::translation(3.0, 4.0, 12.0);
        assert_abs_diff_eq!(planar_distance(&pose, &tag), 5.0);
    }
}
