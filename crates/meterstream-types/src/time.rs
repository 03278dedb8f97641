//! Logical clock for stream accrual.
//!
//! The ledger never reads wall time on its own. Every operation takes the
//! current time as an argument, which keeps accrual deterministic and lets
//! tests drive the clock explicitly. Callers are responsible for feeding a
//! monotonically non-decreasing `now`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A point in time, in whole seconds since an arbitrary epoch.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Timestamp(u64);

impl Timestamp {
    #[must_use]
    pub const fn new(secs: u64) -> Self {
        Self(secs)
    }

    #[must_use]
    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Whole seconds elapsed since `earlier`, zero if `earlier` is later.
    #[must_use]
    pub fn elapsed_since(&self, earlier: Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    #[must_use]
    pub fn checked_add_secs(self, secs: u64) -> Option<Self> {
        self.0.checked_add(secs).map(Self)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}
