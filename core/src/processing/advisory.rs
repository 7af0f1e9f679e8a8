//! Cooldown for user-facing advisories.
//!
//! Keeps a lost-tracking message from being re-emitted on every frame while
//! the condition persists.

use std::time::Duration;

pub struct AdvisoryCooldown {
    window: Duration,
    last_shown_at: Option<Duration>,
}

impl AdvisoryCooldown {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_shown_at: None,
        }
    }

    /// Returns true and arms the cooldown if the advisory may be shown at `now`.
    pub fn try_fire(&mut self, now: Duration) -> bool {
        let ready = match self.last_shown_at {
            None => true,
            Some(shown) => now.saturating_sub(shown) >= self.window,
        };
        if ready {
            self.last_shown_at = Some(now);
        }
        ready
    }

    /// Re-arms immediately, e.g. after a successful rep.
    pub fn clear(&mut self) {
        self.last_shown_at = None;
    }

    pub fn last_shown_at(&self) -> Option<Duration> {
        self.last_shown_at
    }
}

impl Default for AdvisoryCooldown {
    fn default() -> Self {
        Self::new(Duration::from_millis(2000))
    }
}
