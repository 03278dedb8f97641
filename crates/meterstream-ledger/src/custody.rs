//! Custody conservation invariant checker.
//!
//! Mathematical invariant enforced after every operation:
//! ```text
//! ∀ asset: custody held == Σ(inflows) − Σ(outflows)
//!                       == Σ over streams of (deposit − withdrawn)
//! ```
//!
//! If this invariant ever breaks, the ledger has created or destroyed money.
//! This is the ultimate safety net: every mutation that moves funds records
//! its flow here, and `verify` cross-checks the books on demand.

use std::collections::{HashMap, HashSet};

use meterstream_types::{Amount, AssetId, LedgerError, Result};

/// Tracks per-asset custody flows and validates conservation.
pub struct CustodyBook {
    /// Total moved into custody per asset since genesis.
    inflows: HashMap<AssetId, Amount>,
    /// Total paid out of custody per asset since genesis.
    outflows: HashMap<AssetId, Amount>,
}

impl CustodyBook {
    /// Create a new empty custody book.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inflows: HashMap::new(),
            outflows: HashMap::new(),
        }
    }

    /// Record funds entering custody (stream creation, top-up).
    ///
    /// Genesis-cumulative totals saturate at `u128::MAX`; a saturated book
    /// no longer matches real custody and `verify` reports the divergence.
    pub fn record_inflow(&mut self, asset: &AssetId, amount: Amount) {
        let total = self.inflows.entry(asset.clone()).or_insert(Amount::ZERO);
        *total = total.saturating_add(amount);
    }

    /// Record funds leaving custody (withdrawal, termination refund).
    pub fn record_outflow(&mut self, asset: &AssetId, amount: Amount) {
        let total = self.outflows.entry(asset.clone()).or_insert(Amount::ZERO);
        *total = total.saturating_add(amount);
    }

    /// Expected custody for an asset: inflows − outflows.
    #[must_use]
    pub fn expected_custody(&self, asset: &AssetId) -> Amount {
        self.total_inflows(asset)
            .saturating_sub(self.total_outflows(asset))
    }

    /// Verify that the actual custody a vault holds matches the expected
    /// custody (inflows − outflows) for a given asset.
    ///
    /// # Errors
    /// Returns [`LedgerError::CustodyInvariantViolation`] if actual ≠ expected.
    pub fn verify(&self, asset: &AssetId, actual_custody: Amount) -> Result<()> {
        let expected = self.expected_custody(asset);
        if actual_custody != expected {
            return Err(LedgerError::CustodyInvariantViolation {
                reason: format!(
                    "Asset {asset}: actual custody {actual_custody} != expected {expected} \
                     (inflows={}, outflows={})",
                    self.total_inflows(asset),
                    self.total_outflows(asset),
                ),
            });
        }
        Ok(())
    }

    /// Get all assets with recorded flows.
    #[must_use]
    pub fn tracked_assets(&self) -> Vec<AssetId> {
        let mut assets: HashSet<AssetId> = self.inflows.keys().cloned().collect();
        assets.extend(self.outflows.keys().cloned());
        assets.into_iter().collect()
    }

    /// Total inflows for an asset.
    #[must_use]
    pub fn total_inflows(&self, asset: &AssetId) -> Amount {
        self.inflows.get(asset).copied().unwrap_or(Amount::ZERO)
    }

    /// Total outflows for an asset.
    #[must_use]
    pub fn total_outflows(&self, asset: &AssetId) -> Amount {
        self.outflows.get(asset).copied().unwrap_or(Amount::ZERO)
    }
}

impl Default for CustodyBook {
    fn default() -> Self {
        Self::new()
    }
}
