// lumen_core/src/estimation/confidence.rs

use crate::config::{ConfidenceTuning, StdDevPresets, VisionConfig};
use crate::estimation::UncertaintyModel;
use crate::layout::TagLayout;
use crate::messages::Detection;
use crate::types::{planar_distance, Pose2, StdDevs};
use std::sync::Arc;
use tracing::trace;

/// The std dev reported for observations the filter should ignore.
pub const DISTRUST_STD_DEVS: StdDevs = StdDevs::new(f64::MAX, f64::MAX, f64::MAX);

/// Distance- and tag-count-based confidence heuristic.
///
/// More resolved tags means a tighter baseline; uncertainty then grows with
/// the square of the mean distance to those tags. A lone tag seen from too
/// far away is distrusted outright.
#[derive(Debug, Clone)]
pub struct ConfidenceModel {
    layout: Arc<TagLayout>,
    presets: StdDevPresets,
    tuning: ConfidenceTuning,
}

impl ConfidenceModel {
    pub fn new(layout: Arc<TagLayout>, presets: StdDevPresets, tuning: ConfidenceTuning) -> Self {
        Self {
            layout,
            presets,
            tuning,
        }
    }

    pub fn from_config(config: &VisionConfig, layout: Arc<TagLayout>) -> Self {
        Self::new(layout, config.std_devs, config.confidence)
    }

    pub fn presets(&self) -> &StdDevPresets {
        &self.presets
    }

    pub fn tuning(&self) -> &ConfidenceTuning {
        &self.tuning
    }

    /// Count and mean planar distance of the detections whose tag is on the field map.
    fn resolve(&self, pose: &Pose2, detections: &[Detection]) -> (usize, f64) {
        let (num_tags, total) = detections
            .iter()
            .filter_map(|d| self.layout.pose_of(d.fiducial_id))
            .fold((0usize, 0.0), |(n, sum), tag| {
                (n + 1, sum + planar_distance(pose, tag))
            });

        if num_tags == 0 {
            (0, 0.0)
        } else {
            (num_tags, total / num_tags as f64)
        }
    }
}

impl UncertaintyModel for ConfidenceModel {
    fn estimate_std_devs(&self, pose: &Pose2, detections: &[Detection]) -> StdDevs {
        let (num_tags, avg_dist) = self.resolve(pose, detections);
        if num_tags == 0 {
            return self.presets.single_tag;
        }

        let baseline = if num_tags > 1 {
            self.presets.multi_tag
        } else {
            self.presets.single_tag
        };

        if num_tags == 1 && avg_dist > self.tuning.max_single_tag_distance {
            trace!(avg_dist, "lone tag beyond cutoff, distrusting estimate");
            return DISTRUST_STD_DEVS;
        }

        baseline * (1.0 + avg_dist * avg_dist / self.tuning.distance_scale)
    }
}
