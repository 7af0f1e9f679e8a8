use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use squatcore::pose::{RepEvent, TimedFrame};
use squatcore::processing::{SessionSummary, TrainingSession};

/// A non-empty event together with the frame time it was raised at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub timestamp_ms: u64,
    pub event: RepEvent,
}

pub struct WorkflowResult {
    pub summary: SessionSummary,
    pub events: Vec<EventRecord>,
}

impl WorkflowResult {
    pub fn advisories(&self) -> usize {
        self.events
            .iter()
            .filter(|record| matches!(record.event, RepEvent::PoseIncomplete { .. }))
            .count()
    }
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn new_session(&self) -> anyhow::Result<TrainingSession> {
        TrainingSession::new(self.config.detector.clone()).context("creating training session")
    }

    /// Runs `frames` through a fresh session, one at a time, in order.
    pub fn execute(&self, frames: &[TimedFrame]) -> anyhow::Result<WorkflowResult> {
        let mut session = self.new_session()?;
        session.start();

        let mut events = Vec::new();
        for frame in frames {
            let event = session.process(frame);
            if event != RepEvent::None {
                events.push(EventRecord {
                    timestamp_ms: frame.timestamp_ms,
                    event,
                });
            }
        }

        let summary = session.stop();
        Ok(WorkflowResult { summary, events })
    }
}
