use squatcore::pose::{Landmark, LEFT_HIP, LEFT_KNEE, POSE_LANDMARK_COUNT, RIGHT_HIP, RIGHT_KNEE};

/// Upright subject centred in frame, in MediaPipe Pose index order.
const STANDING: [(f32, f32); POSE_LANDMARK_COUNT] = [
    (0.500, 0.150), // nose
    (0.510, 0.135),
    (0.520, 0.135),
    (0.530, 0.135),
    (0.490, 0.135),
    (0.480, 0.135),
    (0.470, 0.135),
    (0.545, 0.145),
    (0.455, 0.145),
    (0.510, 0.170),
    (0.490, 0.170),
    (0.580, 0.250), // shoulders
    (0.420, 0.250),
    (0.600, 0.370),
    (0.400, 0.370),
    (0.600, 0.480), // wrists
    (0.400, 0.480),
    (0.600, 0.510),
    (0.400, 0.510),
    (0.595, 0.515),
    (0.405, 0.515),
    (0.590, 0.500),
    (0.410, 0.500),
    (0.550, 0.500), // hips
    (0.450, 0.500),
    (0.550, 0.680), // knees
    (0.450, 0.680),
    (0.550, 0.860), // ankles
    (0.450, 0.860),
    (0.555, 0.880),
    (0.445, 0.880),
    (0.560, 0.900),
    (0.440, 0.900),
];

const TEMPLATE_VISIBILITY: f32 = 0.95;

/// Poses the template so both knees bend to `angle_deg`, seen from the side.
///
/// Shins stay vertical; hips swing back on a circle around the knees and the
/// upper body follows the hips.
pub fn pose_at_knee_angle(angle_deg: f32) -> Vec<Landmark> {
    let mut landmarks: Vec<Landmark> = STANDING
        .iter()
        .map(|&(x, y)| Landmark::new(x, y, TEMPLATE_VISIBILITY))
        .collect();

    let theta = angle_deg.clamp(0.0, 180.0).to_radians();
    let mut shift = (0.0, 0.0);
    for (hip, knee) in [(LEFT_HIP, LEFT_KNEE), (RIGHT_HIP, RIGHT_KNEE)] {
        let thigh = STANDING[knee].1 - STANDING[hip].1;
        let knee_pos = STANDING[knee];
        let posed = (
            knee_pos.0 + thigh * theta.sin(),
            knee_pos.1 + thigh * theta.cos(),
        );
        shift = (posed.0 - STANDING[hip].0, posed.1 - STANDING[hip].1);
        landmarks[hip].x = posed.0;
        landmarks[hip].y = posed.1;
    }

    for landmark in landmarks.iter_mut().take(LEFT_HIP) {
        landmark.x += shift.0;
        landmark.y += shift.1;
    }
    landmarks
}
