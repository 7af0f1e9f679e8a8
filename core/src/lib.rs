//! Rep-detection core for camera-driven squat counting.
//!
//! An external pose model supplies one landmark set per frame; this crate turns
//! that stream into knee angles, gates untrustworthy frames and emits discrete
//! "rep completed" and "pose incomplete" events. It performs no I/O.

pub mod math;
pub mod pose;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use pose::{Landmark, LandmarkFrame, RepEvent, TimedFrame};
pub use prelude::{ConfigError, DetectorConfig, Dimensionality, FrameError};
pub use processing::{RepDetector, RepState, TrainingSession};
