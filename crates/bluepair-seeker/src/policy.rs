// ============================================
// File: crates/bluepair-seeker/src/policy.rs
// ============================================
//! # Handshake Retry Policy
//!
//! ## Creation Reason
//! Captures every retry-related knob for one handshake session in a
//! single value, so the controller's retry loop is a pure function of
//! this policy plus the failure it just saw.
//!
//! ## Main Functionality
//! - `RetryPolicy`: bounds, status filters, and adaptive timeouts
//! - `timeout_for`: short/long timeout selection by elapsed time
//!
//! ## Timeout Selection
//! Early attempts fail fast (transient radio noise clears quickly);
//! once a session has been running past the spent-time threshold the
//! provider is likely slow to wake, so later attempts wait longer.
//!
//! ## ⚠️ Important Note for Next Developer
//! - `max_retries` counts ADDITIONAL attempts; total attempts is
//!   `max_retries + 1`
//! - Setting `max_retries` to zero disables retries entirely, which
//!   also pins every attempt to the base operation timeout
//!
//! ## Last Modified
//! v0.1.0 - Initial policy definitions

use std::collections::HashSet;
use std::time::Duration;

use crate::error::{Result, SeekerError};

// ============================================
// Defaults
// ============================================

/// Additional attempts after the first failure.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

const DEFAULT_SHORT_TIMEOUT_MS: u64 = 3_000;
const DEFAULT_LONG_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_SHORT_RETRY_MAX_SPENT_MS: u64 = 5_000;
const DEFAULT_BASE_OPERATION_TIMEOUT_SECS: u64 = 3;

// ============================================
// RetryPolicy
// ============================================

/// Retry configuration captured once per handshake session.
///
/// # Termination
/// Every loop driven by this policy is bounded: attempts never exceed
/// [`RetryPolicy::max_attempts`], and each attempt's wait is bounded
/// by [`RetryPolicy::timeout_for`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts allowed after the first failure.
    pub max_retries: u32,
    /// GATT status codes that must never be retried.
    pub no_retry_status_codes: HashSet<i32>,
    /// Whether timeout-classified failures are retried.
    pub retry_on_timeout: bool,
    /// Per-attempt timeout while under the spent-time threshold.
    pub short_timeout: Duration,
    /// Per-attempt timeout once past the spent-time threshold.
    pub long_timeout: Duration,
    /// Elapsed session time at which attempts switch to the long
    /// timeout.
    pub short_retry_max_spent_time: Duration,
    /// Timeout used for every attempt when retries are disabled.
    pub base_operation_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            no_retry_status_codes: HashSet::new(),
            retry_on_timeout: true,
            short_timeout: Duration::from_millis(DEFAULT_SHORT_TIMEOUT_MS),
            long_timeout: Duration::from_millis(DEFAULT_LONG_TIMEOUT_MS),
            short_retry_max_spent_time: Duration::from_millis(DEFAULT_SHORT_RETRY_MAX_SPENT_MS),
            base_operation_timeout: Duration::from_secs(DEFAULT_BASE_OPERATION_TIMEOUT_SECS),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with the default knobs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of additional attempts.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the status codes that terminate the handshake immediately.
    #[must_use]
    pub fn with_no_retry_status_codes(mut self, codes: impl IntoIterator<Item = i32>) -> Self {
        self.no_retry_status_codes = codes.into_iter().collect();
        self
    }

    /// Sets whether timeouts are retried.
    #[must_use]
    pub const fn with_retry_on_timeout(mut self, retry: bool) -> Self {
        self.retry_on_timeout = retry;
        self
    }

    /// Sets the short/long attempt timeouts.
    #[must_use]
    pub const fn with_timeouts(mut self, short: Duration, long: Duration) -> Self {
        self.short_timeout = short;
        self.long_timeout = long;
        self
    }

    /// Sets the elapsed-time threshold for switching to the long
    /// timeout.
    #[must_use]
    pub const fn with_short_retry_max_spent_time(mut self, threshold: Duration) -> Self {
        self.short_retry_max_spent_time = threshold;
        self
    }

    /// Sets the timeout used when retries are disabled.
    #[must_use]
    pub const fn with_base_operation_timeout(mut self, timeout: Duration) -> Self {
        self.base_operation_timeout = timeout;
        self
    }

    /// Validates the policy.
    ///
    /// # Errors
    /// Returns an error if any timeout is zero or the short timeout
    /// exceeds the long one.
    pub fn validate(&self) -> Result<()> {
        if self.short_timeout.is_zero() || self.long_timeout.is_zero() {
            return Err(SeekerError::config_invalid(
                "timeouts",
                "attempt timeouts must be non-zero",
            ));
        }
        if self.base_operation_timeout.is_zero() {
            return Err(SeekerError::config_invalid(
                "base_operation_timeout",
                "must be non-zero",
            ));
        }
        if self.short_timeout > self.long_timeout {
            return Err(SeekerError::config_invalid(
                "timeouts",
                "short timeout cannot exceed long timeout",
            ));
        }
        Ok(())
    }

    /// Returns `true` when the policy allows any retries at all.
    #[must_use]
    pub const fn retries_enabled(&self) -> bool {
        self.max_retries > 0
    }

    /// Total attempts the policy allows (initial + retries).
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Selects this attempt's timeout from the session's elapsed time.
    ///
    /// With retries disabled the base operation timeout applies
    /// unconditionally. Otherwise attempts started before the
    /// spent-time threshold use the short timeout, later ones the
    /// long timeout.
    #[must_use]
    pub fn timeout_for(&self, elapsed: Duration) -> Duration {
        if !self.retries_enabled() {
            return self.base_operation_timeout;
        }
        if elapsed < self.short_retry_max_spent_time {
            self.short_timeout
        } else {
            self.long_timeout
        }
    }

    /// Returns `true` if a failure with this status code may be
    /// retried.
    #[must_use]
    pub fn allows_status(&self, status: i32) -> bool {
        !self.no_retry_status_codes.contains(&status)
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.max_attempts(), 4);
        assert!(policy.retry_on_timeout);
        assert!(policy.no_retry_status_codes.is_empty());
        assert!(policy.retries_enabled());
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_timeout_selection_around_threshold() {
        let policy = RetryPolicy::default();

        assert_eq!(
            policy.timeout_for(Duration::from_millis(4_999)),
            Duration::from_millis(3_000)
        );
        assert_eq!(
            policy.timeout_for(Duration::from_millis(5_000)),
            Duration::from_millis(10_000)
        );
        assert_eq!(
            policy.timeout_for(Duration::from_millis(5_001)),
            Duration::from_millis(10_000)
        );
    }

    #[test]
    fn test_timeout_with_retries_disabled() {
        let policy = RetryPolicy::default()
            .with_max_retries(0)
            .with_base_operation_timeout(Duration::from_secs(5));

        assert!(!policy.retries_enabled());
        assert_eq!(policy.timeout_for(Duration::ZERO), Duration::from_secs(5));
        assert_eq!(
            policy.timeout_for(Duration::from_secs(3600)),
            Duration::from_secs(5)
        );
    }

    #[test]
    fn test_status_filter() {
        let policy = RetryPolicy::default().with_no_retry_status_codes([257]);

        assert!(!policy.allows_status(257));
        assert!(policy.allows_status(133));
    }

    #[test]
    fn test_validation_rejects_bad_timeouts() {
        let policy = RetryPolicy::default().with_timeouts(Duration::ZERO, Duration::from_secs(1));
        assert!(policy.validate().is_err());

        let policy = RetryPolicy::default()
            .with_timeouts(Duration::from_secs(10), Duration::from_secs(1));
        assert!(policy.validate().is_err());

        let policy = RetryPolicy::default().with_base_operation_timeout(Duration::ZERO);
        assert!(policy.validate().is_err());
    }
}
