use serde::{Deserialize, Serialize};
use squatcore::pose::RepEvent;
use squatcore::processing::SessionStatus;

/// Snapshot served to UI clients polling the bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionModel {
    pub status: SessionStatus,
    pub last_event: RepEvent,
}
