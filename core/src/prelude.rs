use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which landmark coordinates take part in joint-angle computation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Dimensionality {
    /// Image-plane angles from `x` and `y` only.
    #[default]
    Planar,
    /// Angles in 3-D using the model's relative `z` depth as well.
    Spatial,
}

/// Tunables shared by the visibility gate, advisory cooldown and rep detector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetectorConfig {
    /// Average knee angle below which a standing user counts as squatting.
    pub down_threshold_deg: f32,
    /// Average knee angle above which a squatting user counts as standing again.
    pub up_threshold_deg: f32,
    /// A rep only counts if the user stands back up within this window.
    pub max_rep_duration_ms: u64,
    /// Minimum landmark visibility trusted for decisions.
    pub visibility_floor: f32,
    /// Minimum gap between two "pose incomplete" advisories.
    pub advisory_cooldown_ms: u64,
    pub dimensionality: Dimensionality,
    pub incomplete_message: String,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            down_threshold_deg: 120.0,
            up_threshold_deg: 160.0,
            max_rep_duration_ms: 2000,
            visibility_floor: 0.5,
            advisory_cooldown_ms: 2000,
            dimensionality: Dimensionality::Planar,
            incomplete_message: "Make sure your hips, knees and ankles are in view".to_string(),
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("down_threshold_deg", self.down_threshold_deg),
            ("up_threshold_deg", self.up_threshold_deg),
        ] {
            if !(value > 0.0 && value <= 180.0) {
                return Err(ConfigError::AngleOutOfRange { name, value });
            }
        }
        if self.down_threshold_deg >= self.up_threshold_deg {
            return Err(ConfigError::ThresholdOrder {
                down: self.down_threshold_deg,
                up: self.up_threshold_deg,
            });
        }
        if !(0.0..=1.0).contains(&self.visibility_floor) {
            return Err(ConfigError::VisibilityFloor(self.visibility_floor));
        }
        if self.max_rep_duration_ms == 0 {
            return Err(ConfigError::ZeroDuration("max_rep_duration_ms"));
        }
        if self.advisory_cooldown_ms == 0 {
            return Err(ConfigError::ZeroDuration("advisory_cooldown_ms"));
        }
        Ok(())
    }

    pub fn max_rep_duration(&self) -> Duration {
        Duration::from_millis(self.max_rep_duration_ms)
    }

    pub fn advisory_cooldown(&self) -> Duration {
        Duration::from_millis(self.advisory_cooldown_ms)
    }
}

/// Rejected configuration values.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{name} must lie in (0, 180] degrees, got {value}")]
    AngleOutOfRange { name: &'static str, value: f32 },
    #[error("down threshold {down} must be below up threshold {up}")]
    ThresholdOrder { down: f32, up: f32 },
    #[error("visibility floor must lie in [0, 1], got {0}")]
    VisibilityFloor(f32),
    #[error("{0} must be non-zero")]
    ZeroDuration(&'static str),
}

/// Reasons a frame cannot be trusted for rep decisions.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    #[error("landmark {index} missing from frame of {len}")]
    MissingLandmark { index: usize, len: usize },
    #[error("landmark {index} not visible")]
    NotVisible { index: usize },
    #[error("degenerate segment at {joint}")]
    DegenerateSegment { joint: &'static str },
}

pub type FrameResult<T> = Result<T, FrameError>;
