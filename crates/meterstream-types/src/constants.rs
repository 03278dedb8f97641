//! System-wide constants for the MeterStream ledger.

/// Minimum runway a deposit or top-up must buy, in whole seconds.
///
/// Amounts that floor-divide to zero seconds at the stream's rate are
/// rejected rather than stranded as permanent dust.
pub const MIN_STREAM_SECONDS: u64 = 1;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Ledger name.
pub const LEDGER_NAME: &str = "MeterStream";
