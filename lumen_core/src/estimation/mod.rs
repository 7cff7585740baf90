// lumen_core/src/estimation/mod.rs

use crate::messages::Detection;
use crate::types::{Pose2, StdDevs};
use dyn_clone::DynClone;
use std::fmt::Debug;

// --- UNCERTAINTY MODEL TRAIT ---
// Maps one camera's pose estimate to the noise the fusion filter should assume for it.
pub trait UncertaintyModel: DynClone + Debug + Send + Sync {
    /// Returns (σx, σy, σheading) for `pose`, given the fiducials that produced it.
    ///
    /// Never fails: inputs that carry no usable information degrade to a
    /// conservative baseline instead of an error.
    fn estimate_std_devs(&self, pose: &Pose2, detections: &[Detection]) -> StdDevs;
}

// This macro automatically generates the implementation of `Clone` for `Box<dyn UncertaintyModel>`.
dyn_clone::clone_trait_object!(UncertaintyModel);

pub mod confidence;
pub mod solver;
