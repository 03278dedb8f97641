//! Configuration types for a MeterStream ledger instance.

use serde::{Deserialize, Serialize};

use crate::AccountId;

/// Configuration fixed at ledger construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// The single principal allowed to halt streams. Fixed for the life of
    /// the ledger; there is no rotation mechanism.
    pub halting_authority: AccountId,
}

impl LedgerConfig {
    #[must_use]
    pub fn new(halting_authority: AccountId) -> Self {
        Self { halting_authority }
    }
}
