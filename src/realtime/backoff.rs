//! Exponential backoff for realtime reconnection.

use std::time::Duration;

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Reconnection settings.
#[derive(Debug, Clone, Copy, PartialEq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconnectPolicy {
    /// Whether a dropped connection is retried at all.
    enabled: bool,
    /// Delay before the first retry.
    initial_delay_ms: u64,
    /// Upper bound on any single delay.
    max_delay_ms: u64,
    /// Retries before giving up.
    max_attempts: u32,
    /// Growth factor between consecutive delays.
    multiplier: f64,
}

impl ReconnectPolicy {
    /// Policy that never reconnects.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Returns a copy with `enabled` replaced.
    pub fn with_enabled(self, enabled: bool) -> Self {
        Self { enabled, ..self }
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_delay_ms: 1_000,
            max_delay_ms: 30_000,
            max_attempts: 10,
            multiplier: 2.0,
        }
    }
}

/// Backoff progress for one run of reconnect attempts.
#[derive(Debug, Clone, Copy)]
pub struct BackoffState {
    policy: ReconnectPolicy,
    attempts: u32,
    delay_ms: u64,
}

impl BackoffState {
    /// Starts a fresh schedule.
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            policy,
            attempts: 0,
            delay_ms: policy.initial_delay_ms,
        }
    }

    /// Back to the first delay; called after a connection succeeds.
    pub fn reset(&mut self) {
        *self = Self::new(self.policy);
    }

    /// Attempts made so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Whether no more attempts are allowed.
    pub fn is_exhausted(&self) -> bool {
        !self.policy.enabled || self.attempts >= self.policy.max_attempts
    }

    /// Advance to the next attempt, updating the delay for the subsequent attempt.
    ///
    /// Returns the delay to wait *before* performing this attempt.
    pub fn next_delay_and_advance(&mut self) -> Option<Duration> {
        if self.is_exhausted() {
            return None;
        }

        let current = self.delay_ms;
        self.attempts += 1;
        self.delay_ms = ((self.delay_ms as f64) * self.policy.multiplier)
            .min(self.policy.max_delay_ms as f64) as u64;
        Some(Duration::from_millis(current.min(self.policy.max_delay_ms)))
    }
}
