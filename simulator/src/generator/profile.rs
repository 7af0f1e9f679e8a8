use crate::generator::template::pose_at_knee_angle;
use anyhow::Context;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use squatcore::pose::{LandmarkFrame, TimedFrame, LEFT_ANKLE};
use std::f32::consts::PI;

/// Configuration for generating a synthetic squat session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub reps: usize,
    /// Time from leaving the standing pose to standing up again.
    pub rep_duration_ms: u64,
    /// Standing pause before each rep and after the last one.
    pub rest_ms: u64,
    pub fps: u32,
    pub standing_angle_deg: f32,
    pub bottom_angle_deg: f32,
    /// Uniform jitter added to every coordinate, in normalized units.
    pub noise: f32,
    /// Probability that a frame loses sight of the left ankle.
    pub occlusion_rate: f32,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            reps: 5,
            rep_duration_ms: 1200,
            rest_ms: 600,
            fps: 30,
            standing_angle_deg: 175.0,
            bottom_angle_deg: 90.0,
            noise: 0.002,
            occlusion_rate: 0.0,
            seed: 0,
        }
    }
}

impl GeneratorConfig {
    fn cycle_ms(&self) -> u64 {
        self.rest_ms + self.rep_duration_ms
    }

    /// Knee angle the synthetic subject holds at `t_ms`.
    pub fn knee_angle_at(&self, t_ms: u64) -> f32 {
        let cycle = self.cycle_ms();
        if cycle == 0 || self.rep_duration_ms == 0 || t_ms >= cycle * self.reps as u64 {
            return self.standing_angle_deg;
        }
        let phase = t_ms % cycle;
        if phase < self.rest_ms {
            return self.standing_angle_deg;
        }
        let progress = (phase - self.rest_ms) as f32 / self.rep_duration_ms as f32;
        let depth = self.standing_angle_deg - self.bottom_angle_deg;
        self.standing_angle_deg - depth * (PI * progress).sin()
    }
}

pub fn build_session_frames(config: &GeneratorConfig) -> anyhow::Result<Vec<TimedFrame>> {
    let interval_ms = 1000.0 / config.fps.max(1) as f64;
    let active_ms = (config.reps as u64)
        .checked_mul(config.cycle_ms())
        .context("overflow computing synthetic session length")?;
    let total_ms = active_ms
        .checked_add(config.rest_ms)
        .context("overflow computing synthetic session length")?;
    let frame_count = (total_ms as f64 / interval_ms).floor() as usize + 1;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let occlusion = config.occlusion_rate.clamp(0.0, 1.0) as f64;
    let mut frames = Vec::with_capacity(frame_count);

    for index in 0..frame_count {
        let timestamp_ms = (index as f64 * interval_ms).round() as u64;
        let mut landmarks = pose_at_knee_angle(config.knee_angle_at(timestamp_ms));

        if config.noise > 0.0 {
            for landmark in landmarks.iter_mut() {
                landmark.x += rng.gen_range(-config.noise..config.noise);
                landmark.y += rng.gen_range(-config.noise..config.noise);
            }
        }
        if occlusion > 0.0 && rng.gen_bool(occlusion) {
            landmarks[LEFT_ANKLE].visibility = 0.2;
        }

        frames.push(TimedFrame::new(timestamp_ms, LandmarkFrame::new(landmarks)));
    }

    Ok(frames)
}
