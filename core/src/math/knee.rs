use crate::math::geometry::landmark_angle;
use crate::math::stats::StatsHelper;
use crate::pose::{
    Landmark, LandmarkFrame, LEFT_ANKLE, LEFT_HIP, LEFT_KNEE, RIGHT_ANKLE, RIGHT_HIP, RIGHT_KNEE,
};
use crate::prelude::{Dimensionality, FrameError, FrameResult};

/// Bilateral knee flexion derived from one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct KneeMetrics {
    pub left_angle: f32,
    pub right_angle: f32,
    pub average_angle: f32,
    pub left_hip: Landmark,
    pub right_hip: Landmark,
    pub left_knee: Landmark,
    pub right_knee: Landmark,
    pub left_ankle: Landmark,
    pub right_ankle: Landmark,
}

fn landmark_at(frame: &LandmarkFrame, index: usize) -> FrameResult<Landmark> {
    frame
        .get(index)
        .copied()
        .ok_or(FrameError::MissingLandmark {
            index,
            len: frame.len(),
        })
}

/// Computes hip-knee-ankle angles for both legs and their mean.
pub fn knee_metrics(
    frame: &LandmarkFrame,
    dimensionality: Dimensionality,
) -> FrameResult<KneeMetrics> {
    let left_hip = landmark_at(frame, LEFT_HIP)?;
    let right_hip = landmark_at(frame, RIGHT_HIP)?;
    let left_knee = landmark_at(frame, LEFT_KNEE)?;
    let right_knee = landmark_at(frame, RIGHT_KNEE)?;
    let left_ankle = landmark_at(frame, LEFT_ANKLE)?;
    let right_ankle = landmark_at(frame, RIGHT_ANKLE)?;

    let left_angle = landmark_angle(&left_hip, &left_knee, &left_ankle, dimensionality);
    if !left_angle.is_finite() {
        return Err(FrameError::DegenerateSegment { joint: "left knee" });
    }
    let right_angle = landmark_angle(&right_hip, &right_knee, &right_ankle, dimensionality);
    if !right_angle.is_finite() {
        return Err(FrameError::DegenerateSegment { joint: "right knee" });
    }

    Ok(KneeMetrics {
        left_angle,
        right_angle,
        average_angle: StatsHelper::mean(&[left_angle, right_angle]),
        left_hip,
        right_hip,
        left_knee,
        right_knee,
        left_ankle,
        right_ankle,
    })
}
