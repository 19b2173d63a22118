// ============================================
// File: crates/bluepair-seeker/src/sightings.rs
// ============================================
//! # Provider Sighting Log
//!
//! ## Creation Reason
//! Mid-handshake the retry loop needs to know whether the provider is
//! still on the air, and under which address. The scanner feeds this
//! log; the handshake probes it between attempts.
//!
//! ## Main Functionality
//! - `SightingLog`: model-id keyed record of recent sightings
//! - `SignalProbe`: the question the retry loop asks
//! - `ModelSignalProbe`: probe bound to one model id
//!
//! ## Main Logical Flow
//! 1. Scan results call `record(model_id, address)` as frames arrive
//! 2. A handshake takes a probe for its provider's model id
//! 3. Between retries the probe answers: current address, or `None`
//!    once the last sighting is older than the freshness window
//!
//! ## ⚠️ Important Note for Next Developer
//! - A sighting under a NEW address replaces the old one; the probe
//!   then reports the new address and the handshake re-targets
//! - Freshness is judged at probe time, not at record time
//!
//! ## Last Modified
//! v0.1.0 - Initial sighting log

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;

use bluepair_common::time::AtomicInstant;
use bluepair_common::{BluetoothAddress, ModelId};

// ============================================
// Constants
// ============================================

/// Sightings older than this no longer count as "on the air".
pub const DEFAULT_FRESHNESS_WINDOW: Duration = Duration::from_secs(10);

// ============================================
// SignalProbe Trait
// ============================================

/// Asks whether a provider is still observable over the air.
pub trait SignalProbe: Send + Sync {
    /// Returns the address the provider is currently seen under, or
    /// `None` when it is no longer observed.
    ///
    /// `previous` is the address the caller last used; implementations
    /// may ignore it when they track providers by identity instead.
    fn check(&self, previous: BluetoothAddress) -> Option<BluetoothAddress>;
}

// ============================================
// Sighting
// ============================================

#[derive(Debug)]
struct Sighting {
    address: BluetoothAddress,
    last_seen: AtomicInstant,
}

impl Sighting {
    fn new(address: BluetoothAddress) -> Self {
        Self {
            address,
            last_seen: AtomicInstant::now(),
        }
    }
}

// ============================================
// SightingLog
// ============================================

/// Shared record of which address each known provider was last seen
/// under, and when.
///
/// Cheap to clone; clones share the same underlying map.
#[derive(Debug, Clone)]
pub struct SightingLog {
    sightings: Arc<DashMap<ModelId, Sighting>>,
    freshness_window: Duration,
}

impl Default for SightingLog {
    fn default() -> Self {
        Self::new()
    }
}

impl SightingLog {
    /// Creates an empty log with the default freshness window.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sightings: Arc::new(DashMap::new()),
            freshness_window: DEFAULT_FRESHNESS_WINDOW,
        }
    }

    /// Overrides the freshness window.
    #[must_use]
    pub fn with_freshness_window(mut self, window: Duration) -> Self {
        self.freshness_window = window;
        self
    }

    /// Records a sighting of `model_id` under `address`.
    ///
    /// Called from scan-result handling; replaces any previous address
    /// and restarts the entry's freshness clock.
    pub fn record(&self, model_id: ModelId, address: BluetoothAddress) {
        self.sightings
            .entry(model_id)
            .and_modify(|sighting| {
                sighting.address = address;
                sighting.last_seen.touch();
            })
            .or_insert_with(|| Sighting::new(address));
    }

    /// Returns the address `model_id` was last seen under, if the
    /// sighting is still fresh.
    #[must_use]
    pub fn current_address(&self, model_id: ModelId) -> Option<BluetoothAddress> {
        let sighting = self.sightings.get(&model_id)?;
        if sighting.last_seen.is_older_than(self.freshness_window) {
            None
        } else {
            Some(sighting.address)
        }
    }

    /// Drops every entry whose sighting has gone stale.
    pub fn evict_stale(&self) {
        self.sightings
            .retain(|_, sighting| !sighting.last_seen.is_older_than(self.freshness_window));
    }

    /// Number of providers currently tracked (fresh or not).
    #[must_use]
    pub fn len(&self) -> usize {
        self.sightings.len()
    }

    /// Returns `true` if no providers are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sightings.is_empty()
    }

    /// Builds a probe answering for one model id against this log.
    #[must_use]
    pub fn probe_for(&self, model_id: ModelId) -> ModelSignalProbe {
        ModelSignalProbe {
            log: self.clone(),
            model_id,
        }
    }
}

// ============================================
// ModelSignalProbe
// ============================================

/// [`SignalProbe`] answering from a [`SightingLog`] for one model id.
#[derive(Debug, Clone)]
pub struct ModelSignalProbe {
    log: SightingLog,
    model_id: ModelId,
}

impl SignalProbe for ModelSignalProbe {
    fn check(&self, _previous: BluetoothAddress) -> Option<BluetoothAddress> {
        self.log.current_address(self.model_id)
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> ModelId {
        ModelId::from_u32(0x00D0_44EB).unwrap()
    }

    fn address(last: u8) -> BluetoothAddress {
        BluetoothAddress::new([0xBB, 0xBB, 0xBB, 0xBB, 0xBB, last])
    }

    #[test]
    fn test_fresh_sighting_is_reported() {
        let log = SightingLog::new();
        log.record(model(), address(0x1E));

        assert_eq!(log.current_address(model()), Some(address(0x1E)));
    }

    #[test]
    fn test_unknown_model_reports_none() {
        let log = SightingLog::new();
        assert_eq!(log.current_address(model()), None);
    }

    #[test]
    fn test_stale_sighting_reports_none() {
        let log = SightingLog::new().with_freshness_window(Duration::ZERO);
        log.record(model(), address(0x1E));

        assert_eq!(log.current_address(model()), None);
    }

    #[test]
    fn test_new_address_replaces_old() {
        let log = SightingLog::new();
        log.record(model(), address(0x1E));
        log.record(model(), address(0x2F));

        assert_eq!(log.current_address(model()), Some(address(0x2F)));
    }

    #[test]
    fn test_evict_stale_drops_entries() {
        let log = SightingLog::new().with_freshness_window(Duration::ZERO);
        log.record(model(), address(0x1E));
        assert_eq!(log.len(), 1);

        log.evict_stale();
        assert!(log.is_empty());
    }

    #[test]
    fn test_probe_answers_from_shared_log() {
        let log = SightingLog::new();
        let probe = log.probe_for(model());

        assert_eq!(probe.check(address(0x1E)), None);

        log.record(model(), address(0x2F));
        assert_eq!(probe.check(address(0x1E)), Some(address(0x2F)));
    }
}
