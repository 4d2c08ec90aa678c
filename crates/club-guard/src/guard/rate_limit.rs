//! Fixed-window attempt limiter keyed by sender identifier.
//!
//! Each identifier holds a single [`RateLimitEntry`]. The window restarts on the first attempt
//! made after it has elapsed, so memory stays O(1) per identifier at the cost of allowing a
//! burst across a window boundary. State lives only as long as the limiter value.

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use super::clock::Clock;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(300_000);

/// Limits applied to every identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    max_attempts: u32,
    window: Duration,
}

impl RateLimitPolicy {
    pub fn new(max_attempts: u32, window: Duration) -> Result<Self, RateLimitPolicyError> {
        if max_attempts == 0 {
            return Err(RateLimitPolicyError::ZeroAttempts);
        }
        if window.is_zero() {
            return Err(RateLimitPolicyError::ZeroWindow);
        }
        Ok(Self {
            max_attempts,
            window,
        })
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    fn window_millis(&self) -> i64 {
        self.window.as_millis().min(i64::MAX as u128) as i64
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            window: DEFAULT_WINDOW,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateLimitPolicyError {
    #[error("rate limit must allow at least one attempt")]
    ZeroAttempts,
    #[error("rate limit window must be longer than zero")]
    ZeroWindow,
}

/// Attempts recorded for one identifier in its current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitEntry {
    pub count: u32,
    pub last_attempt_ms: i64,
}

pub struct RateLimiter<C> {
    policy: RateLimitPolicy,
    clock: C,
    attempts: HashMap<String, RateLimitEntry>,
}

impl<C: Clock> RateLimiter<C> {
    pub fn new(policy: RateLimitPolicy, clock: C) -> Self {
        Self {
            policy,
            clock,
            attempts: HashMap::new(),
        }
    }

    pub fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }

    /// Record an attempt for `identifier` and report whether it may proceed.
    ///
    /// A denied attempt leaves the entry untouched.
    pub fn is_allowed(&mut self, identifier: &str) -> bool {
        let now = self.clock.now_millis();
        let window = self.policy.window_millis();
        let max_attempts = self.policy.max_attempts;

        let Some(entry) = self.attempts.get_mut(identifier) else {
            self.attempts.insert(
                identifier.to_string(),
                RateLimitEntry {
                    count: 1,
                    last_attempt_ms: now,
                },
            );
            debug!(identifier, "first submission attempt recorded");
            return true;
        };

        if now - entry.last_attempt_ms > window {
            *entry = RateLimitEntry {
                count: 1,
                last_attempt_ms: now,
            };
            debug!(identifier, "rate limit window restarted");
            return true;
        }

        if entry.count < max_attempts {
            entry.count += 1;
            entry.last_attempt_ms = now;
            debug!(identifier, count = entry.count, "submission attempt recorded");
            return true;
        }

        false
    }

    /// Time until `identifier`'s window lapses; zero for unseen identifiers.
    pub fn remaining_time(&self, identifier: &str) -> Duration {
        let Some(entry) = self.attempts.get(identifier) else {
            return Duration::ZERO;
        };

        let elapsed = (self.clock.now_millis() - entry.last_attempt_ms).max(0);
        let remaining = (self.policy.window_millis() - elapsed).max(0);
        Duration::from_millis(remaining as u64)
    }

    pub fn entry(&self, identifier: &str) -> Option<RateLimitEntry> {
        self.attempts.get(identifier).copied()
    }

    pub fn tracked_identifiers(&self) -> usize {
        self.attempts.len()
    }
}
