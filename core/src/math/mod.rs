pub mod geometry;
pub mod knee;
pub mod stats;

pub use geometry::{joint_angle, joint_angle_3d, landmark_angle};
pub use knee::{knee_metrics, KneeMetrics};
pub use stats::StatsHelper;
