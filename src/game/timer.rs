//! Countdown timer for a play session.
//!
//! The timer never reads the clock itself; every query takes the current
//! time from the caller, so a session driven by recorded or simulated
//! events behaves exactly like a live one.

use chrono::{DateTime, Duration, Local};

/// Timer configuration for a session
#[derive(Debug, Clone)]
pub struct TimerConfig {
    /// Total time allowed.
    pub duration: Duration,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            duration: Duration::seconds(30),
        }
    }
}

/// Session countdown state
#[derive(Debug, Clone)]
pub struct GameTimer {
    started_at: Option<DateTime<Local>>,
    config: TimerConfig,
    is_expired: bool,
}

impl GameTimer {
    /// Creates a stopped timer.
    pub fn new(config: TimerConfig) -> Self {
        Self {
            started_at: None,
            config,
            is_expired: false,
        }
    }

    /// Starts counting down from `now`.
    pub fn start(&mut self, now: DateTime<Local>) {
        self.started_at = Some(now);
        self.is_expired = false;
    }

    /// When the countdown began, if it has.
    pub fn started_at(&self) -> Option<DateTime<Local>> {
        self.started_at
    }

    /// Whether `start` has been called.
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Time since start, never negative. Zero before start.
    pub fn elapsed(&self, now: DateTime<Local>) -> Duration {
        match self.started_at {
            Some(start) => (now - start).max(Duration::zero()),
            None => Duration::zero(),
        }
    }

    /// Time left before expiry, saturating at zero.
    pub fn remaining(&self, now: DateTime<Local>) -> Duration {
        if !self.is_running() {
            return self.config.duration;
        }
        if self.is_expired {
            return Duration::zero();
        }
        (self.config.duration - self.elapsed(now)).max(Duration::zero())
    }

    /// Whether the timer has been observed as expired by [`update`](Self::update).
    pub fn is_expired(&self) -> bool {
        self.is_expired
    }

    /// Re-evaluates expiry at `now`.
    ///
    /// Returns true only on the update where the timer first runs out.
    pub fn update(&mut self, now: DateTime<Local>) -> bool {
        if !self.is_running() || self.is_expired {
            return false;
        }
        self.is_expired = self.elapsed(now) >= self.config.duration;
        self.is_expired
    }

    /// Remaining time as `SS.ss`.
    pub fn format_time(&self, now: DateTime<Local>) -> String {
        let seconds = self.remaining(now).num_milliseconds() as f64 / 1000.0;
        format!("{:05.2}", seconds)
    }

    /// Total time allowed.
    pub fn total_time(&self) -> Duration {
        self.config.duration
    }
}
