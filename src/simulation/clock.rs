//! Elapsed run time across pause/resume cycles
//!
//! Only the engine's control thread touches the clock, so it needs no
//! synchronization. Each transition has an `*_at` form taking the current
//! instant explicitly; the plain forms call it with [`Instant::now`].

use std::time::{Duration, Instant};

/// Accumulates active time; paused and stopped intervals are excluded
#[derive(Debug, Clone, Default)]
pub struct ElapsedClock {
    accumulated: Duration,
    /// Start of the current active interval, if one is open
    started_at: Option<Instant>,
    paused: bool,
}

impl ElapsedClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    /// Open an active interval. No-op when one is already open.
    pub fn start_at(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
        self.paused = false;
    }

    pub fn pause(&mut self) {
        self.pause_at(Instant::now());
    }

    /// Fold the active interval into the total. No-op unless an interval is open.
    pub fn pause_at(&mut self, now: Instant) {
        if self.paused {
            return;
        }
        if let Some(started) = self.started_at.take() {
            self.accumulated += now.saturating_duration_since(started);
            self.paused = true;
        }
    }

    pub fn resume(&mut self) {
        self.resume_at(Instant::now());
    }

    /// Open a new interval after a pause. No-op unless paused.
    pub fn resume_at(&mut self, now: Instant) {
        if !self.paused {
            return;
        }
        self.paused = false;
        self.started_at = Some(now);
    }

    pub fn stop(&mut self) {
        self.stop_at(Instant::now());
    }

    /// Fold any open interval and leave the clock stopped
    pub fn stop_at(&mut self, now: Instant) {
        if let Some(started) = self.started_at.take() {
            self.accumulated += now.saturating_duration_since(started);
        }
        self.paused = false;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn elapsed_at(&self, now: Instant) -> Duration {
        match self.started_at {
            Some(started) => self.accumulated + now.saturating_duration_since(started),
            None => self.accumulated,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(Instant::now())
    }

    /// Whole seconds of active time
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed().as_secs()
    }

    pub fn is_active(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}
