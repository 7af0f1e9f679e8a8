use crate::pose::{RepEvent, TimedFrame};
use crate::prelude::{ConfigError, DetectorConfig};
use crate::processing::detector::{RepDetector, RepState};
use crate::telemetry::log::LogManager;
use crate::telemetry::metrics::MetricsRecorder;
use serde::{Deserialize, Serialize};

/// Totals reported when a session stops.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub rep_count: u32,
    pub frames_processed: usize,
    pub frames_rejected: usize,
}

/// Point-in-time view of a session for drivers and status endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub active: bool,
    pub state: RepState,
    pub rep_count: u32,
    pub knee_angle: Option<f32>,
    pub frames_processed: usize,
    pub frames_rejected: usize,
}

/// One training session: frames are only evaluated between `start` and `stop`.
pub struct TrainingSession {
    detector: RepDetector,
    metrics: MetricsRecorder,
    logger: LogManager,
    active: bool,
}

impl TrainingSession {
    pub fn new(config: DetectorConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_detector(RepDetector::new(config)?))
    }

    pub fn with_detector(detector: RepDetector) -> Self {
        Self {
            detector,
            metrics: MetricsRecorder::new(),
            logger: LogManager::new(),
            active: false,
        }
    }

    pub fn start(&mut self) {
        self.detector.reset();
        self.metrics.reset();
        self.active = true;
        self.logger.record("training session started");
    }

    pub fn stop(&mut self) -> SessionSummary {
        let summary = self.summary();
        self.detector.reset();
        self.active = false;
        self.logger.record(&format!(
            "training session stopped after {} reps ({} frames, {} rejected)",
            summary.rep_count, summary.frames_processed, summary.frames_rejected
        ));
        summary
    }

    /// Feeds one frame through the detector; inactive sessions ignore frames.
    pub fn process(&mut self, frame: &TimedFrame) -> RepEvent {
        if !self.active {
            return RepEvent::None;
        }
        let event = self
            .detector
            .process_frame(&frame.landmarks, frame.timestamp());
        self.metrics.record_processed();
        if self.detector.last_rejection().is_some() {
            self.metrics.record_rejected();
        }
        if event.is_rep() {
            self.metrics.record_rep();
        }
        event
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn rep_count(&self) -> u32 {
        self.detector.rep_count()
    }

    pub fn detector(&self) -> &RepDetector {
        &self.detector
    }

    pub fn summary(&self) -> SessionSummary {
        let snapshot = self.metrics.snapshot();
        SessionSummary {
            rep_count: self.detector.rep_count(),
            frames_processed: snapshot.processed,
            frames_rejected: snapshot.rejected,
        }
    }

    pub fn status(&self) -> SessionStatus {
        let snapshot = self.metrics.snapshot();
        SessionStatus {
            active: self.active,
            state: self.detector.state(),
            rep_count: self.detector.rep_count(),
            knee_angle: self
                .detector
                .last_metrics()
                .map(|metrics| metrics.average_angle),
            frames_processed: snapshot.processed,
            frames_rejected: snapshot.rejected,
        }
    }
}

impl Default for TrainingSession {
    fn default() -> Self {
        Self::with_detector(RepDetector::default())
    }
}
