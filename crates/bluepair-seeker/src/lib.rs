// ============================================
// File: crates/bluepair-seeker/src/lib.rs
// ============================================
//! # BluePair Seeker Library
//!
//! ## Creation Reason
//! Provides the seeker side of the secret handshake, orchestrating
//! retries, timeouts, and signal tracking over a GATT connection.
//!
//! ## Main Functionality
//!
//! ### Modules
//! - [`config`]: Seeker configuration management
//! - [`handshake`]: Handshake controller and abort handling
//! - [`policy`]: Retry budget and adaptive timeouts
//! - [`sightings`]: Advertisement freshness tracking
//! - [`events`]: Attempt-level event reporting
//! - [`provider`]: In-process provider for demos and tests
//! - [`error`]: Seeker-specific error types
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      BluePair Seeker                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │  ┌─────────────┐     ┌──────────────┐    ┌──────────────┐  │
//! │  │   Config    │────►│  Handshake   │───►│    Event     │  │
//! │  │   Manager   │     │  Controller  │    │    Sink      │  │
//! │  └─────────────┘     └──────┬───────┘    └──────────────┘  │
//! │                             │                               │
//! │         ┌───────────────────┼────────────────┐              │
//! │         ▼                   ▼                ▼              │
//! │  ┌─────────────┐     ┌─────────────┐   ┌─────────────┐     │
//! │  │   Retry     │     │  Sighting   │   │  Scripted   │     │
//! │  │   Policy    │     │    Log      │   │  Provider   │     │
//! │  └─────────────┘     └─────────────┘   └─────────────┘     │
//! │                                                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │                      GATT Connection                        │
//! │        write request ──►  ◄── response notification         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Handshake Flow
//! ```text
//! Request → Encode → Encrypt → Write → Notify → Decrypt → Response
//!                      (retry with adaptive timeouts on failure)
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - The handshake never opens or closes the link; it only uses it
//! - Retry classification lives in [`handshake`] and its order is
//!   pinned by tests
//! - All timeouts are driven by [`policy::RetryPolicy`]
//!
//! ## Last Modified
//! v0.1.0 - Initial seeker library

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod events;
pub mod handshake;
pub mod policy;
pub mod provider;
pub mod sightings;

// Re-export primary types
pub use config::SeekerConfig;
pub use error::{Result, SeekerError};
pub use handshake::{AbortFlag, HandshakeController};
pub use policy::RetryPolicy;
pub use sightings::SightingLog;
