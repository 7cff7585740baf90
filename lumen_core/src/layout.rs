// lumen_core/src/layout.rs

//! The static field map: fiducial ID to known 3-D pose on the field.
//!
//! A `TagLayout` is validated once when it is built and never mutated
//! afterwards, so it can be shared behind an `Arc` without locking.

use crate::types::{FiducialId, Pose3};
use nalgebra::{Isometry3, Quaternion, Translation3, UnitQuaternion};
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("tag {0} appears more than once in the layout")]
    DuplicateTag(FiducialId),
    #[error("tag {0} has a non-finite pose")]
    NonFinitePose(FiducialId),
    #[error("tag {0} has a zero-length rotation quaternion")]
    DegenerateRotation(FiducialId),
    #[error("field dimensions must be finite and positive, got {length} x {width}")]
    InvalidField { length: f64, width: f64 },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "LayoutFile")]
pub struct TagLayout {
    tags: BTreeMap<FiducialId, Pose3>,
    field_length: f64,
    field_width: f64,
}

impl TagLayout {
    pub fn new(
        tags: impl IntoIterator<Item = (FiducialId, Pose3)>,
        field_length: f64,
        field_width: f64,
    ) -> Result<Self, LayoutError> {
        if !(field_length.is_finite() && field_width.is_finite())
            || field_length <= 0.0
            || field_width <= 0.0
        {
            return Err(LayoutError::InvalidField {
                length: field_length,
                width: field_width,
            });
        }

        let mut map = BTreeMap::new();
        for (id, pose) in tags {
            let finite = pose.translation.vector.iter().all(|v| v.is_finite())
                && pose.rotation.coords.iter().all(|v| v.is_finite());
            if !finite {
                return Err(LayoutError::NonFinitePose(id));
            }
            if map.insert(id, pose).is_some() {
                return Err(LayoutError::DuplicateTag(id));
            }
        }

        Ok(Self {
            tags: map,
            field_length,
            field_width,
        })
    }

    /// The known field pose of a tag, or `None` for IDs not on this field.
    pub fn pose_of(&self, id: FiducialId) -> Option<&Pose3> {
        self.tags.get(&id)
    }

    /// All tags in ascending ID order.
    pub fn tags(&self) -> impl Iterator<Item = (FiducialId, &Pose3)> {
        self.tags.iter().map(|(id, pose)| (*id, pose))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn field_length(&self) -> f64 {
        self.field_length
    }

    pub fn field_width(&self) -> f64 {
        self.field_width
    }
}

// =========================================================================
// == On-Disk Shape ==
// Mirrors the JSON layout files published for the competition field.
// =========================================================================

#[derive(Debug, Deserialize)]
struct LayoutFile {
    tags: Vec<TagEntry>,
    field: FieldEntry,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    #[serde(rename = "ID")]
    id: FiducialId,
    pose: PoseEntry,
}

#[derive(Debug, Deserialize)]
struct PoseEntry {
    translation: TranslationEntry,
    rotation: RotationEntry,
}

#[derive(Debug, Deserialize)]
struct TranslationEntry {
    x: f64,
    y: f64,
    z: f64,
}

#[derive(Debug, Deserialize)]
struct RotationEntry {
    quaternion: QuaternionEntry,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
struct QuaternionEntry {
    w: f64,
    x: f64,
    y: f64,
    z: f64,
}

#[derive(Debug, Deserialize)]
struct FieldEntry {
    length: f64,
    width: f64,
}

impl TryFrom<LayoutFile> for TagLayout {
    type Error = LayoutError;

    fn try_from(file: LayoutFile) -> Result<Self, Self::Error> {
        let mut tags = Vec::with_capacity(file.tags.len());
        for entry in file.tags {
            let t = &entry.pose.translation;
            let q = &entry.pose.rotation.quaternion;
            let raw = Quaternion::new(q.w, q.x, q.y, q.z);
            if raw.norm() <= f64::EPSILON {
                return Err(LayoutError::DegenerateRotation(entry.id));
            }
            tags.push((
                entry.id,
                Isometry3::from_parts(
                    Translation3::new(t.x, t.y, t.z),
                    UnitQuaternion::from_quaternion(raw),
                ),
            ));
        }
        TagLayout::new(tags, file.field.length, file.field.width)
    }
}
