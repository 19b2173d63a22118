// ============================================
// File: crates/bluepair-gatt/src/lib.rs
// ============================================
//! # BluePair GATT - Characteristic I/O Layer
//!
//! ## Creation Reason
//! Provides the GATT abstractions the handshake runs over: a
//! connection trait for writing characteristics and awaiting
//! notifications, plus a scriptable mock for tests.
//!
//! ## Main Functionality
//!
//! ### Modules
//! - [`traits`]: Connection and observer definitions
//! - [`mock`]: Scriptable in-memory connection for testing
//! - [`error`]: GATT-specific error types and status codes
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │             bluepair-seeker                         │
//! │                    │                                │
//! │         ┌──────────┴──────────┐                    │
//! │         ▼                     ▼                    │
//! │   bluepair-core         bluepair-gatt              │
//! │                        You are here ◄──            │
//! │         │                     │                    │
//! │         └──────────┬──────────┘                    │
//! │                    ▼                               │
//! │             bluepair-common                        │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Data Flow
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    Provider                              │
//! │                       ▲                                  │
//! │                       │ write / notify                   │
//! │            ┌──────────┴──────────┐                      │
//! │            │   GattConnection    │                      │
//! │            │  (platform adapter) │                      │
//! │            └──────────┬──────────┘                      │
//! │                       │                                  │
//! │            ┌──────────┴──────────┐                      │
//! │            │   ChangeObserver    │                      │
//! │            │  (bounded waits)    │                      │
//! │            └──────────┬──────────┘                      │
//! │                       │                                  │
//! │                       ▼                                  │
//! │               Handshake logic                            │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Always use the trait for testability; the handshake never
//!   depends on a concrete adapter
//! - Connection lifecycle belongs to the caller, not this crate
//! - `MockConnection` is for tests only
//!
//! ## Last Modified
//! v0.1.0 - Initial GATT layer implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod mock;
pub mod traits;

// Re-export primary types
pub use error::{GattError, Result, GATT_ERROR, GATT_FAILURE};
pub use mock::MockConnection;
pub use traits::{ChangeObserver, CharacteristicId, GattConnection};
