// ============================================
// File: crates/bluepair-seeker/src/events.rs
// ============================================
//! # Handshake Event Reporting
//!
//! ## Creation Reason
//! The handshake emits one structured event per attempt for metrics
//! and postmortems. This module defines the sink interface and the
//! two implementations (tracing-backed for production, recording for
//! tests).
//!
//! ## Main Functionality
//! - `EventCode`: numeric event identifiers, grouped by phase
//! - `EventSink`: fire-and-forget reporting interface
//! - `TracingEventSink` / `RecordingEventSink`
//!
//! ## Event Ordering
//! Each attempt produces `set_current_event` followed by exactly one
//! of `log_current_event_failed` / `log_current_event_succeeded`.
//! Events are observational; control flow never reads them back.
//!
//! ## Last Modified
//! v0.1.0 - Initial event definitions

use parking_lot::Mutex;
use tracing::{debug, warn};

use bluepair_gatt::error::GattError;

// ============================================
// EventCode
// ============================================

/// Numeric event identifiers, grouped by pairing phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum EventCode {
    /// The whole secret handshake session.
    SecretHandshake = 1210,
    /// One GATT write/notify round of the secret handshake.
    SecretHandshakeGattCommunication = 1290,
}

impl EventCode {
    /// Returns the numeric code.
    #[must_use]
    pub const fn as_u16(&self) -> u16 {
        *self as u16
    }
}

// ============================================
// EventSink Trait
// ============================================

/// Fire-and-forget event reporting.
///
/// Implementations must tolerate being called from async contexts, so
/// they must not block.
pub trait EventSink: Send + Sync {
    /// Marks `code` as the event in progress.
    fn set_current_event(&self, code: EventCode);

    /// Records the in-progress event as failed with its cause.
    fn log_current_event_failed(&self, cause: &GattError);

    /// Records the in-progress event as succeeded.
    fn log_current_event_succeeded(&self);
}

// ============================================
// TracingEventSink
// ============================================

/// Event sink that forwards to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl TracingEventSink {
    /// Creates a tracing-backed sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl EventSink for TracingEventSink {
    fn set_current_event(&self, code: EventCode) {
        debug!(code = code.as_u16(), event = ?code, "event started");
    }

    fn log_current_event_failed(&self, cause: &GattError) {
        warn!(%cause, status = ?cause.status_code(), "event failed");
    }

    fn log_current_event_succeeded(&self) {
        debug!("event succeeded");
    }
}

// ============================================
// RecordingEventSink
// ============================================

/// One recorded sink call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventRecord {
    /// `set_current_event` was called.
    Set(EventCode),
    /// `log_current_event_failed` was called; carries the cause's
    /// status code (when it had one) and rendered message.
    Failed(Option<i32>, String),
    /// `log_current_event_succeeded` was called.
    Succeeded,
}

/// Event sink that records every call for test assertions.
///
/// Testing only; production flows use [`TracingEventSink`].
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    records: Mutex<Vec<EventRecord>>,
}

impl RecordingEventSink {
    /// Creates an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of everything recorded so far.
    #[must_use]
    pub fn records(&self) -> Vec<EventRecord> {
        self.records.lock().clone()
    }

    /// Number of recorded failures.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.records
            .lock()
            .iter()
            .filter(|record| matches!(record, EventRecord::Failed(..)))
            .count()
    }

    /// Number of recorded successes.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.records
            .lock()
            .iter()
            .filter(|record| matches!(record, EventRecord::Succeeded))
            .count()
    }

    /// Number of recorded attempt starts.
    #[must_use]
    pub fn set_count(&self) -> usize {
        self.records
            .lock()
            .iter()
            .filter(|record| matches!(record, EventRecord::Set(_)))
            .count()
    }
}

impl EventSink for RecordingEventSink {
    fn set_current_event(&self, code: EventCode) {
        self.records.lock().push(EventRecord::Set(code));
    }

    fn log_current_event_failed(&self, cause: &GattError) {
        self.records
            .lock()
            .push(EventRecord::Failed(cause.status_code(), cause.to_string()));
    }

    fn log_current_event_succeeded(&self) {
        self.records.lock().push(EventRecord::Succeeded);
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_code_values() {
        assert_eq!(EventCode::SecretHandshake.as_u16(), 1210);
        assert_eq!(EventCode::SecretHandshakeGattCommunication.as_u16(), 1290);
    }

    #[test]
    fn test_recording_sink_preserves_order() {
        let sink = RecordingEventSink::new();

        sink.set_current_event(EventCode::SecretHandshakeGattCommunication);
        sink.log_current_event_failed(&GattError::status("write", 133));
        sink.set_current_event(EventCode::SecretHandshakeGattCommunication);
        sink.log_current_event_succeeded();

        let records = sink.records();
        assert_eq!(records.len(), 4);
        assert_eq!(
            records[0],
            EventRecord::Set(EventCode::SecretHandshakeGattCommunication)
        );
        assert!(matches!(records[1], EventRecord::Failed(Some(133), _)));
        assert_eq!(records[3], EventRecord::Succeeded);

        assert_eq!(sink.set_count(), 2);
        assert_eq!(sink.failure_count(), 1);
        assert_eq!(sink.success_count(), 1);
    }

    #[test]
    fn test_tracing_sink_is_callable() {
        let sink = TracingEventSink::new();
        sink.set_current_event(EventCode::SecretHandshake);
        sink.log_current_event_failed(&GattError::timeout("wait", 3000));
        sink.log_current_event_succeeded();
    }
}
