// lumen_core/src/prelude.rs

// --- Core Abstractions (The main contracts of the library) ---
pub use crate::estimation::solver::PoseSolver;
pub use crate::estimation::UncertaintyModel;
pub use crate::io::{CameraDevice, CameraIo, DetectionNoise};

// --- Core Data Structures (The "nouns" of the library) ---
pub use crate::config::{CameraConfig, ConfigError, SimCameraProperties, VisionConfig};
pub use crate::layout::{LayoutError, TagLayout};
pub use crate::messages::{CameraObservation, Detection, PipelineResult, PoseObservation};
pub use crate::types::{FiducialId, Pose2, Pose3, StdDevs};

// --- Concrete Implementations (Export common ones for convenience) ---
pub use crate::aggregator::VisionAggregator;
pub use crate::estimation::confidence::{ConfidenceModel, DISTRUST_STD_DEVS};
pub use crate::estimation::solver::CoprocessorPoseEstimator;
pub use crate::io::{HardwareCamera, ReplayCamera, SimCameraFeed, SimulatedCamera};
