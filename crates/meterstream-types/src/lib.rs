//! # meterstream-types
//!
//! Shared types, errors, and configuration for the **MeterStream**
//! payment-streaming ledger.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`StreamId`], [`AccountId`], [`RecordId`]
//! - **Arithmetic**: [`Amount`] (u128 base units, checked), [`Timestamp`]
//!   (caller-supplied seconds clock)
//! - **Asset model**: [`AssetId`]
//! - **Stream model**: [`Stream`], [`StreamSnapshot`] and the pure accrual
//!   math both the ledger and its consumers rely on
//! - **Record model**: [`StreamRecord`], [`RecordEntry`], [`RecordKind`]
//! - **Configuration**: [`LedgerConfig`]
//! - **Errors**: [`LedgerError`] with `MS_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod amount;
pub mod asset;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod record;
pub mod stream;
pub mod time;

// Re-export all primary types at crate root for ergonomic imports:
//   use meterstream_types::{Stream, Amount, Timestamp, LedgerError, ...};

pub use amount::*;
pub use asset::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use record::*;
pub use stream::*;
pub use time::*;

// Constants are accessed via `meterstream_types::constants::FOO`
// (not re-exported to avoid name collisions).
