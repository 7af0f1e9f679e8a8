pub mod advisory;
pub mod detector;
pub mod session;
pub mod visibility;

pub use advisory::AdvisoryCooldown;
pub use detector::{RepDetector, RepState};
pub use session::{SessionStatus, SessionSummary, TrainingSession};
pub use visibility::VisibilityGate;
