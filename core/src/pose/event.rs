use serde::{Deserialize, Serialize};

/// Outcome of evaluating one frame, handed back to the driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RepEvent {
    None,
    /// Required landmarks are not trustworthy; the driver shows `message`.
    PoseIncomplete { message: String },
    /// A valid rep finished; the driver updates its counter and plays a cue.
    RepCompleted { total_count: u32 },
}

impl RepEvent {
    pub fn is_rep(&self) -> bool {
        matches!(self, RepEvent::RepCompleted { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            RepEvent::None => "none",
            RepEvent::PoseIncomplete { .. } => "pose_incomplete",
            RepEvent::RepCompleted { .. } => "rep_completed",
        }
    }
}
