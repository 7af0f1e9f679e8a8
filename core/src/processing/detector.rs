//! Squat repetition state machine.
//!
//! Two asymmetric thresholds give hysteresis: the user has to bend below the
//! down threshold before standing above the up threshold counts, so angle
//! jitter around either value cannot double count.

use crate::math::knee::{knee_metrics, KneeMetrics};
use crate::pose::{LandmarkFrame, RepEvent, LOWER_BODY};
use crate::prelude::{ConfigError, DetectorConfig, FrameError, FrameResult};
use crate::processing::advisory::AdvisoryCooldown;
use crate::processing::visibility::VisibilityGate;
use crate::telemetry::log::LogManager;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepState {
    #[default]
    Standing,
    Squatting,
}

pub struct RepDetector {
    config: DetectorConfig,
    gate: VisibilityGate,
    advisory: AdvisoryCooldown,
    state: RepState,
    last_down: Option<Duration>,
    rep_count: u32,
    last_metrics: Option<KneeMetrics>,
    last_rejection: Option<FrameError>,
    logger: LogManager,
}

impl RepDetector {
    pub fn new(config: DetectorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: DetectorConfig) -> Self {
        Self {
            gate: VisibilityGate::new(config.visibility_floor),
            advisory: AdvisoryCooldown::new(config.advisory_cooldown()),
            config,
            state: RepState::Standing,
            last_down: None,
            rep_count: 0,
            last_metrics: None,
            last_rejection: None,
            logger: LogManager::new(),
        }
    }

    /// Evaluates one frame observed at `now` and reports what happened.
    ///
    /// Frames that fail the visibility gate, miss landmarks or produce a
    /// degenerate angle leave the state and timer untouched.
    pub fn process_frame(&mut self, frame: &LandmarkFrame, now: Duration) -> RepEvent {
        let metrics = match self.evaluate(frame) {
            Ok(metrics) => metrics,
            Err(err) => return self.reject(err, now),
        };
        self.last_rejection = None;
        let angle = metrics.average_angle;
        self.last_metrics = Some(metrics);

        match self.state {
            RepState::Standing if angle < self.config.down_threshold_deg => {
                self.enter(RepState::Squatting, angle);
                self.last_down = Some(now);
                RepEvent::None
            }
            RepState::Squatting if angle > self.config.up_threshold_deg => {
                self.enter(RepState::Standing, angle);
                let elapsed = self.last_down.map(|down| now.saturating_sub(down));
                match elapsed {
                    Some(elapsed) if elapsed < self.config.max_rep_duration() => {
                        self.rep_count += 1;
                        self.advisory.clear();
                        self.logger.record(&format!(
                            "rep {} completed in {} ms",
                            self.rep_count,
                            elapsed.as_millis()
                        ));
                        RepEvent::RepCompleted {
                            total_count: self.rep_count,
                        }
                    }
                    _ => {
                        self.logger.record(&format!(
                            "rep discarded: took {} ms",
                            elapsed.unwrap_or_default().as_millis()
                        ));
                        RepEvent::None
                    }
                }
            }
            _ => RepEvent::None,
        }
    }

    /// Back to a fresh session: standing, zero reps, no pending timers.
    pub fn reset(&mut self) {
        self.state = RepState::Standing;
        self.last_down = None;
        self.rep_count = 0;
        self.last_metrics = None;
        self.last_rejection = None;
        self.advisory.clear();
    }

    pub fn state(&self) -> RepState {
        self.state
    }

    pub fn rep_count(&self) -> u32 {
        self.rep_count
    }

    pub fn last_down(&self) -> Option<Duration> {
        self.last_down
    }

    /// Knee metrics from the most recent frame that passed the gate.
    pub fn last_metrics(&self) -> Option<&KneeMetrics> {
        self.last_metrics.as_ref()
    }

    /// Why the most recent frame was rejected, if it was.
    pub fn last_rejection(&self) -> Option<&FrameError> {
        self.last_rejection.as_ref()
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    fn evaluate(&self, frame: &LandmarkFrame) -> FrameResult<KneeMetrics> {
        self.gate.check(frame, &LOWER_BODY)?;
        knee_metrics(frame, self.config.dimensionality)
    }

    fn reject(&mut self, err: FrameError, now: Duration) -> RepEvent {
        self.logger.rejected(&err.to_string());
        self.last_rejection = Some(err);
        if self.advisory.try_fire(now) {
            RepEvent::PoseIncomplete {
                message: self.config.incomplete_message.clone(),
            }
        } else {
            RepEvent::None
        }
    }

    fn enter(&mut self, next: RepState, angle: f32) {
        self.logger.transition(self.state, next, angle);
        self.state = next;
    }
}

impl Default for RepDetector {
    fn default() -> Self {
        Self::with_valid_config(DetectorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{
        Landmark, LEFT_ANKLE, LEFT_HIP, LEFT_KNEE, POSE_LANDMARK_COUNT, RIGHT_ANKLE, RIGHT_HIP,
        RIGHT_KNEE,
    };

    /// Both legs bent to `angle` degrees with the shins vertical.
    fn squat_frame(angle: f32) -> LandmarkFrame {
        let mut landmarks = vec![Landmark::new(0.5, 0.3, 0.9); POSE_LANDMARK_COUNT];
        let theta = angle.to_radians();
        let (dx, dy) = (0.2 * theta.sin(), 0.2 * theta.cos());
        landmarks[LEFT_KNEE] = Landmark::new(0.4, 0.6, 0.9);
        landmarks[LEFT_ANKLE] = Landmark::new(0.4, 0.8, 0.9);
        landmarks[LEFT_HIP] = Landmark::new(0.4 + dx, 0.6 + dy, 0.9);
        landmarks[RIGHT_KNEE] = Landmark::new(0.6, 0.6, 0.9);
        landmarks[RIGHT_ANKLE] = Landmark::new(0.6, 0.8, 0.9);
        landmarks[RIGHT_HIP] = Landmark::new(0.6 - dx, 0.6 + dy, 0.9);
        LandmarkFrame::new(landmarks)
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn run(detector: &mut RepDetector, samples: &[(u64, f32)]) -> Vec<RepEvent> {
        samples
            .iter()
            .map(|&(at, angle)| detector.process_frame(&squat_frame(angle), ms(at)))
            .collect()
    }

    fn reps(events: &[RepEvent]) -> usize {
        events.iter().filter(|event| event.is_rep()).count()
    }

    #[test]
    fn frame_helper_produces_requested_angle() {
        let metrics = knee_metrics(&squat_frame(100.0), Default::default()).unwrap();
        assert!((metrics.average_angle - 100.0).abs() < 0.05);
    }

    #[test]
    fn quick_squat_counts_once() {
        let mut detector = RepDetector::default();
        let events = run(&mut detector, &[(0, 170.0), (400, 100.0), (1400, 170.0)]);
        assert_eq!(
            events,
            vec![
                RepEvent::None,
                RepEvent::None,
                RepEvent::RepCompleted { total_count: 1 }
            ]
        );
        assert_eq!(detector.rep_count(), 1);
        assert_eq!(detector.state(), RepState::Standing);
    }

    #[test]
    fn slow_squat_is_discarded() {
        let mut detector = RepDetector::default();
        let events = run(&mut detector, &[(0, 170.0), (400, 100.0), (2900, 170.0)]);
        assert_eq!(reps(&events), 0);
        assert_eq!(detector.rep_count(), 0);
        assert_eq!(detector.state(), RepState::Standing);
    }

    #[test]
    fn tempo_window_is_exclusive() {
        let mut detector = RepDetector::default();
        run(&mut detector, &[(0, 100.0), (2000, 170.0)]);
        assert_eq!(detector.rep_count(), 0);
    }

    #[test]
    fn tempo_window_is_configurable() {
        let config = DetectorConfig {
            max_rep_duration_ms: 4000,
            ..Default::default()
        };
        let mut detector = RepDetector::new(config).unwrap();
        run(&mut detector, &[(0, 100.0), (2500, 170.0)]);
        assert_eq!(detector.rep_count(), 1);
    }

    #[test]
    fn hidden_ankle_reports_incomplete_pose_without_transition() {
        let mut detector = RepDetector::default();
        run(&mut detector, &[(0, 100.0)]);
        assert_eq!(detector.state(), RepState::Squatting);

        let mut frame = squat_frame(175.0);
        frame.landmarks_mut()[LEFT_ANKLE].visibility = 0.2;
        let event = detector.process_frame(&frame, ms(300));
        assert!(matches!(event, RepEvent::PoseIncomplete { .. }));
        assert_eq!(detector.state(), RepState::Squatting);
        assert_eq!(detector.last_down(), Some(ms(0)));
        assert_eq!(
            detector.last_rejection(),
            Some(&FrameError::NotVisible { index: LEFT_ANKLE })
        );
    }

    #[test]
    fn incomplete_pose_is_rate_limited() {
        let mut detector = RepDetector::default();
        let mut frame = squat_frame(170.0);
        frame.landmarks_mut()[RIGHT_HIP].x = 1.4;

        let fired: Vec<bool> = [0, 33, 1000, 1999, 2000, 2500, 4000]
            .iter()
            .map(|&at| {
                matches!(
                    detector.process_frame(&frame, ms(at)),
                    RepEvent::PoseIncomplete { .. }
                )
            })
            .collect();
        assert_eq!(fired, vec![true, false, false, false, true, false, true]);
    }

    #[test]
    fn successful_rep_rearms_advisory() {
        let mut detector = RepDetector::default();
        let mut hidden = squat_frame(170.0);
        hidden.landmarks_mut()[LEFT_KNEE].visibility = 0.1;

        assert!(matches!(
            detector.process_frame(&hidden, ms(0)),
            RepEvent::PoseIncomplete { .. }
        ));
        run(&mut detector, &[(100, 100.0), (600, 170.0)]);
        assert_eq!(detector.rep_count(), 1);
        assert!(matches!(
            detector.process_frame(&hidden, ms(700)),
            RepEvent::PoseIncomplete { .. }
        ));
    }

    #[test]
    fn malformed_frames_hold_state() {
        let mut detector = RepDetector::default();
        run(&mut detector, &[(0, 100.0)]);

        let short = LandmarkFrame::new(vec![Landmark::new(0.5, 0.5, 0.9); 20]);
        let event = detector.process_frame(&short, ms(100));
        assert!(matches!(event, RepEvent::PoseIncomplete { .. }));

        let mut collapsed = squat_frame(170.0);
        let knee = collapsed.landmarks()[RIGHT_KNEE];
        collapsed.landmarks_mut()[RIGHT_HIP] = knee;
        assert_eq!(detector.process_frame(&collapsed, ms(200)), RepEvent::None);
        assert_eq!(
            detector.last_rejection(),
            Some(&FrameError::DegenerateSegment { joint: "right knee" })
        );
        assert_eq!(detector.state(), RepState::Squatting);

        run(&mut detector, &[(500, 170.0)]);
        assert_eq!(detector.rep_count(), 1);
    }

    #[test]
    fn dead_zone_never_transitions() {
        let mut detector = RepDetector::default();
        let samples: Vec<(u64, f32)> = (0..40)
            .map(|i| (i * 33, if i % 2 == 0 { 130.0 } else { 150.0 }))
            .collect();
        let events = run(&mut detector, &samples);
        assert!(events.iter().all(|event| *event == RepEvent::None));
        assert_eq!(detector.state(), RepState::Standing);
    }

    #[test]
    fn jitter_near_thresholds_does_not_double_count() {
        let mut detector = RepDetector::default();
        let events = run(
            &mut detector,
            &[
                (0, 170.0),
                (100, 119.0),
                (200, 125.0),
                (300, 115.0),
                (400, 100.0),
                (500, 161.0),
                (600, 155.0),
                (700, 165.0),
                (800, 158.0),
                (900, 170.0),
            ],
        );
        assert_eq!(reps(&events), 1);
        assert_eq!(detector.rep_count(), 1);
    }

    #[test]
    fn consecutive_cycles_count_separately() {
        let mut detector = RepDetector::default();
        let events = run(
            &mut detector,
            &[
                (0, 170.0),
                (300, 100.0),
                (900, 170.0),
                (1200, 100.0),
                (1800, 170.0),
            ],
        );
        assert_eq!(
            events.last(),
            Some(&RepEvent::RepCompleted { total_count: 2 })
        );
    }

    #[test]
    fn reset_clears_session() {
        let mut detector = RepDetector::default();
        run(&mut detector, &[(0, 100.0), (500, 170.0), (900, 100.0)]);
        assert_eq!(detector.rep_count(), 1);
        assert_eq!(detector.state(), RepState::Squatting);

        detector.reset();
        assert_eq!(detector.rep_count(), 0);
        assert_eq!(detector.state(), RepState::Standing);
        assert_eq!(detector.last_down(), None);
        assert!(detector.last_metrics().is_none());

        // A stand-up right after reset must not complete the interrupted rep.
        run(&mut detector, &[(1000, 170.0)]);
        assert_eq!(detector.rep_count(), 0);
    }

    #[test]
    fn count_never_decreases() {
        let mut detector = RepDetector::default();
        let angles = [170.0, 90.0, 175.0, 140.0, 110.0, 165.0, 100.0, 100.0, 170.0];
        let mut previous = 0;
        for (i, angle) in angles.iter().enumerate() {
            detector.process_frame(&squat_frame(*angle), ms(i as u64 * 700));
            assert!(detector.rep_count() >= previous);
            previous = detector.rep_count();
        }
    }

    #[test]
    fn rejects_invalid_config() {
        let config = DetectorConfig {
            up_threshold_deg: 100.0,
            ..Default::default()
        };
        assert!(RepDetector::new(config).is_err());
    }
}
