// lumen_sim/src/simulation/noise.rs

use lumen_core::io::DetectionNoise;
use lumen_core::types::Pose3;
use nalgebra::{Isometry3, Translation3, UnitQuaternion};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal, NormalError};

use crate::simulation::config::NoiseConfig;

/// Independent zero-mean Gaussian error on every translation and rotation axis.
pub struct GaussianDetectionNoise {
    rng: ChaCha8Rng,
    translation: Normal<f64>,
    rotation: Normal<f64>,
}

impl GaussianDetectionNoise {
    pub fn new(config: &NoiseConfig, rng: ChaCha8Rng) -> Result<Self, NormalError> {
        Ok(Self {
            rng,
            translation: Normal::new(0.0, config.translation_stddev)?,
            rotation: Normal::new(0.0, config.rotation_stddev_deg.to_radians())?,
        })
    }
}

impl DetectionNoise for GaussianDetectionNoise {
    fn perturb(&mut self, pose: &Pose3) -> Pose3 {
        let rng = &mut self.rng;
        let offset = Translation3::new(
            self.translation.sample(rng),
            self.translation.sample(rng),
            self.translation.sample(rng),
        );
        let twist = UnitQuaternion::from_euler_angles(
            self.rotation.sample(rng),
            self.rotation.sample(rng),
            self.rotation.sample(rng),
        );
        // Applied in the pose's own frame, like a solver error on that pose.
        pose * Isometry3::from_parts(offset, twist)
    }
}
