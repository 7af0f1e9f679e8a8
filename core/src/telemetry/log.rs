use crate::processing::RepState;
use log::{debug, info};

pub struct LogManager;

impl LogManager {
    pub fn new() -> Self {
        Self
    }

    pub fn record(&self, message: &str) {
        info!("{}", message);
    }

    pub fn transition(&self, from: RepState, to: RepState, knee_angle: f32) {
        info!("{:?} -> {:?} at knee angle {:.1}", from, to, knee_angle);
    }

    pub fn rejected(&self, reason: &str) {
        debug!("frame rejected: {}", reason);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}
