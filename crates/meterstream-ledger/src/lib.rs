//! # meterstream-ledger
//!
//! **Settlement Plane**: the stream state machine, custody conservation,
//! and the append-only record journal.
//!
//! ## Architecture
//!
//! A [`StreamLedger`] processes one caller-timestamped operation at a time:
//! 1. Validates inputs and authority, precomputing all arithmetic
//! 2. Moves funds through the asset's vault (at most one transfer)
//! 3. Commits stream state, the custody book, and a journal record
//!
//! ## Custody Conservation
//!
//! For every asset, three figures must agree at all times:
//! - the custody book (cumulative inflows − outflows)
//! - the sum of unwithdrawn escrow across that asset's streams
//! - the vault's actual held custody
//!
//! [`StreamLedger::verify_custody`] checks all three; any divergence means
//! an accounting bug, not a recoverable condition.

pub mod custody;
pub mod journal;
pub mod ledger;
pub mod registry;

pub use custody::CustodyBook;
pub use journal::RecordJournal;
pub use ledger::StreamLedger;
pub use registry::StreamRegistry;
