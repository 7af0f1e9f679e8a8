//! Visibility gate: decides whether a landmark is trustworthy for decisions.
//!
//! Drawing code may still use untrusted landmarks; the rep detector may not.

use crate::pose::{Landmark, LandmarkFrame};
use crate::prelude::{FrameError, FrameResult};

pub struct VisibilityGate {
    /// Minimum visibility to accept a landmark
    floor: f32,
}

impl VisibilityGate {
    pub fn new(floor: f32) -> Self {
        Self { floor }
    }

    pub fn floor(&self) -> f32 {
        self.floor
    }

    /// Landmark is confident enough and inside the unit frame.
    pub fn is_visible(&self, landmark: &Landmark) -> bool {
        if landmark.visibility.is_nan() || landmark.visibility < self.floor {
            return false;
        }
        (0.0..=1.0).contains(&landmark.x) && (0.0..=1.0).contains(&landmark.y)
    }

    /// Fails on the first index that is absent or not visible.
    pub fn check(&self, frame: &LandmarkFrame, indices: &[usize]) -> FrameResult<()> {
        for &index in indices {
            let landmark = frame.get(index).ok_or(FrameError::MissingLandmark {
                index,
                len: frame.len(),
            })?;
            if !self.is_visible(landmark) {
                return Err(FrameError::NotVisible { index });
            }
        }
        Ok(())
    }
}

impl Default for VisibilityGate {
    fn default() -> Self {
        Self::new(0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{LEFT_ANKLE, LOWER_BODY, POSE_LANDMARK_COUNT};

    #[test]
    fn floor_is_inclusive() {
        let gate = VisibilityGate::default();
        assert!(gate.is_visible(&Landmark::new(0.5, 0.5, 0.5)));
        assert!(!gate.is_visible(&Landmark::new(0.5, 0.5, 0.49)));
    }

    #[test]
    fn out_of_frame_is_hidden() {
        let gate = VisibilityGate::default();
        assert!(gate.is_visible(&Landmark::new(0.0, 1.0, 0.9)));
        assert!(!gate.is_visible(&Landmark::new(-0.01, 0.5, 0.9)));
        assert!(!gate.is_visible(&Landmark::new(0.5, 1.2, 0.9)));
        assert!(!gate.is_visible(&Landmark::new(f32::NAN, 0.5, 0.9)));
    }

    #[test]
    fn check_reports_first_failing_index() {
        let gate = VisibilityGate::default();
        let mut landmarks = vec![Landmark::new(0.5, 0.5, 0.9); POSE_LANDMARK_COUNT];
        landmarks[LEFT_ANKLE].visibility = 0.2;
        let frame = LandmarkFrame::new(landmarks);
        assert_eq!(
            gate.check(&frame, &LOWER_BODY),
            Err(FrameError::NotVisible { index: LEFT_ANKLE })
        );

        let short = LandmarkFrame::new(vec![Landmark::new(0.5, 0.5, 0.9); 24]);
        assert_eq!(
            gate.check(&short, &LOWER_BODY),
            Err(FrameError::MissingLandmark { index: 24, len: 24 })
        );
    }
}
