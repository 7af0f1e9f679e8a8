//! Joint angles from three landmark positions.
//!
//! The angle at vertex `b` is taken between the rays `b→a` and `b→c` using
//! cos(θ) = (u · v) / (|u| × |v|).

use crate::pose::Landmark;
use crate::prelude::Dimensionality;

const MIN_SEGMENT: f32 = 1e-6;

/// Interior angle at `b` in degrees, from image-plane coordinates.
///
/// Returns `NaN` when either segment has no length.
pub fn joint_angle(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> f32 {
    angle_between([a.0 - b.0, a.1 - b.1, 0.0], [c.0 - b.0, c.1 - b.1, 0.0])
}

/// Interior angle at `b` in degrees, including depth.
pub fn joint_angle_3d(a: (f32, f32, f32), b: (f32, f32, f32), c: (f32, f32, f32)) -> f32 {
    angle_between(
        [a.0 - b.0, a.1 - b.1, a.2 - b.2],
        [c.0 - b.0, c.1 - b.1, c.2 - b.2],
    )
}

/// Joint angle between landmarks in the requested dimensionality.
pub fn landmark_angle(
    a: &Landmark,
    b: &Landmark,
    c: &Landmark,
    dimensionality: Dimensionality,
) -> f32 {
    match dimensionality {
        Dimensionality::Planar => joint_angle((a.x, a.y), (b.x, b.y), (c.x, c.y)),
        Dimensionality::Spatial => {
            joint_angle_3d((a.x, a.y, a.z), (b.x, b.y, b.z), (c.x, c.y, c.z))
        }
    }
}

fn angle_between(u: [f32; 3], v: [f32; 3]) -> f32 {
    let dot = u[0] * v[0] + u[1] * v[1] + u[2] * v[2];
    let mag_u = (u[0] * u[0] + u[1] * u[1] + u[2] * u[2]).sqrt();
    let mag_v = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();

    if !(mag_u > MIN_SEGMENT && mag_v > MIN_SEGMENT) {
        return f32::NAN;
    }

    // Rounding can push collinear inputs just past ±1.
    let cos_angle = (dot / (mag_u * mag_v)).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees()
}
