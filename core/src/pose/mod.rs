pub mod event;
pub mod landmark;

pub use event::RepEvent;
pub use landmark::{
    Landmark, LandmarkFrame, TimedFrame, LEFT_ANKLE, LEFT_HIP, LEFT_KNEE, LEFT_SHOULDER,
    LOWER_BODY, NOSE, POSE_LANDMARK_COUNT, RIGHT_ANKLE, RIGHT_HIP, RIGHT_KNEE, RIGHT_SHOULDER,
};
