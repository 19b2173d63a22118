// ============================================
// File: crates/bluepair-common/src/time.rs
// ============================================
//! # Time Utilities
//!
//! ## Creation Reason
//! Provides the atomic timestamp used by the sighting log to track when a
//! device was last seen advertising, without taking a lock on the scan
//! callback path.
//!
//! ## Main Functionality
//! - `AtomicInstant`: Thread-safe wrapper around `Instant`
//!
//! ## Main Logical Flow
//! 1. Each sighting stores an `AtomicInstant` for its last advertisement
//! 2. Scan callbacks refresh it atomically via `touch`
//! 3. Signal probes read `is_older_than` to decide freshness
//!
//! ## ⚠️ Important Note for Next Developer
//! - `AtomicInstant` uses `AtomicU64` internally (nanoseconds since a
//!   process-wide reference instant)
//! - Be aware of potential overflow after ~584 years of uptime
//!
//! ## Last Modified
//! v0.1.0 - Initial time utilities

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

// ============================================
// AtomicInstant
// ============================================

/// Thread-safe wrapper around [`Instant`] for concurrent access.
///
/// # Purpose
/// Scan callbacks and signal probes touch and read the same timestamp from
/// different tasks; storing nanoseconds in an `AtomicU64` keeps both paths
/// lock-free.
///
/// # Implementation
/// Stores nanoseconds elapsed since a reference instant (first use in the
/// process). Uses `Relaxed` ordering: freshness checks tolerate a stale
/// read by one advertisement interval.
///
/// # Example
/// ```
/// use bluepair_common::time::AtomicInstant;
/// use std::time::Duration;
///
/// let last_seen = AtomicInstant::now();
/// assert!(!last_seen.is_older_than(Duration::from_secs(10)));
///
/// // Refresh from another task
/// last_seen.touch();
/// ```
#[derive(Debug)]
pub struct AtomicInstant {
    /// Nanoseconds since the reference instant
    nanos: AtomicU64,
}

impl AtomicInstant {
    /// Reference instant (lazily initialized at first use).
    fn reference() -> Instant {
        use std::sync::OnceLock;
        static REFERENCE: OnceLock<Instant> = OnceLock::new();
        *REFERENCE.get_or_init(Instant::now)
    }

    /// Creates a new `AtomicInstant` set to the current time.
    #[must_use]
    pub fn now() -> Self {
        let nanos = Self::nanos_since_reference(Instant::now());
        Self {
            nanos: AtomicU64::new(nanos),
        }
    }

    fn nanos_since_reference(instant: Instant) -> u64 {
        instant
            .checked_duration_since(Self::reference())
            .map_or(0, |d| d.as_nanos() as u64)
    }

    /// Loads the stored instant.
    #[must_use]
    pub fn load(&self) -> Instant {
        let nanos = self.nanos.load(Ordering::Relaxed);
        Self::reference() + Duration::from_nanos(nanos)
    }

    /// Refreshes the stored instant to the current time.
    pub fn touch(&self) {
        let nanos = Self::nanos_since_reference(Instant::now());
        self.nanos.store(nanos, Ordering::Relaxed);
    }

    /// Returns the elapsed time since the stored instant.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.load().elapsed()
    }

    /// Checks if more than `window` has elapsed since the stored instant.
    #[must_use]
    pub fn is_older_than(&self, window: Duration) -> bool {
        self.elapsed() > window
    }
}

impl Default for AtomicInstant {
    fn default() -> Self {
        Self::now()
    }
}

impl Clone for AtomicInstant {
    fn clone(&self) -> Self {
        Self {
            nanos: AtomicU64::new(self.nanos.load(Ordering::Relaxed)),
        }
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_atomic_instant_basic() {
        let atomic = AtomicInstant::now();
        let loaded = atomic.load();

        // Should be very close to now
        assert!(loaded.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn test_atomic_instant_touch() {
        let atomic = AtomicInstant::now();
        thread::sleep(Duration::from_millis(10));

        let before = atomic.load();
        atomic.touch();
        let after = atomic.load();

        assert!(after > before);
    }

    #[test]
    fn test_atomic_instant_freshness() {
        let atomic = AtomicInstant::now();
        thread::sleep(Duration::from_millis(10));

        assert!(atomic.elapsed() >= Duration::from_millis(10));
        assert!(atomic.is_older_than(Duration::from_millis(5)));
        assert!(!atomic.is_older_than(Duration::from_secs(60)));
    }

    #[test]
    fn test_atomic_instant_clone_snapshot() {
        let atomic = AtomicInstant::now();
        let snapshot = atomic.clone();
        thread::sleep(Duration::from_millis(10));
        atomic.touch();

        assert!(snapshot.load() < atomic.load());
    }
}
