//! The `Stream` entity and its accrual arithmetic.
//!
//! A stream escrows a deposit that the payee earns second by second at a
//! fixed rate. All accrual math lives here as pure functions of the stream
//! fields and a caller-supplied `now`, so the ledger, front-ends, and
//! property tests share one implementation.

use serde::{Deserialize, Serialize};

use crate::{AccountId, Amount, AssetId, StreamId, Timestamp};

/// A single payment stream.
///
/// Streams are never deleted. Once `withdrawn == deposit` and `now` is past
/// `stop_time` the stream is dormant but remains queryable as a historical
/// record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stream {
    pub id: StreamId,
    pub asset: AssetId,
    pub payer: AccountId,
    pub payee: AccountId,
    /// Total escrowed, grows on top-up, shrinks only on early termination.
    pub deposit: Amount,
    pub rate_per_second: Amount,
    pub start_time: Timestamp,
    /// Accrual ceases here. `start_time + deposit / rate`, extended by
    /// top-ups, pulled in by termination.
    pub stop_time: Timestamp,
    /// Cumulative amount already paid out to the payee.
    pub withdrawn: Amount,
    /// Set once by the Halting Authority; never cleared.
    pub halted: bool,
    /// Set once by the payer's early termination; never cleared.
    pub terminated: bool,
}

impl Stream {
    /// A freshly created stream: nothing withdrawn, no flags set.
    #[must_use]
    pub fn open(
        id: StreamId,
        asset: AssetId,
        payer: AccountId,
        payee: AccountId,
        deposit: Amount,
        rate_per_second: Amount,
        start_time: Timestamp,
        stop_time: Timestamp,
    ) -> Self {
        Self {
            id,
            asset,
            payer,
            payee,
            deposit,
            rate_per_second,
            start_time,
            stop_time,
            withdrawn: Amount::ZERO,
            halted: false,
            terminated: false,
        }
    }

    /// The instant accrual is measured at: `now`, clamped to `stop_time`.
    #[must_use]
    pub fn accrued_until(&self, now: Timestamp) -> Timestamp {
        now.min(self.stop_time)
    }

    /// Total amount the payee has earned by `now`.
    ///
    /// `rate × elapsed` over the active window, capped at `deposit`. The cap
    /// also absorbs the unrepresentable-product case: a product past
    /// `u128::MAX` exceeds any storable deposit, so the deposit wins.
    #[must_use]
    pub fn earned(&self, now: Timestamp) -> Amount {
        let elapsed = self.accrued_until(now).elapsed_since(self.start_time);
        match self.rate_per_second.checked_mul_secs(elapsed) {
            Some(gross) => gross.min(self.deposit),
            None => self.deposit,
        }
    }

    /// Earned but not yet withdrawn.
    #[must_use]
    pub fn withdrawable(&self, now: Timestamp) -> Amount {
        self.earned(now).saturating_sub(self.withdrawn)
    }

    /// Escrow still held in custody for this stream.
    #[must_use]
    pub fn remaining_escrow(&self) -> Amount {
        self.deposit.saturating_sub(self.withdrawn)
    }

    /// Whole seconds of accrual left before `stop_time`.
    #[must_use]
    pub fn remaining_runway(&self, now: Timestamp) -> u64 {
        self.stop_time.elapsed_since(now)
    }

    /// Fully drained and past its window: nothing left to pay or accrue.
    #[must_use]
    pub fn is_dormant(&self, now: Timestamp) -> bool {
        self.withdrawn == self.deposit && now >= self.stop_time
    }

    /// Point-in-time view for external consumers.
    #[must_use]
    pub fn snapshot(&self, now: Timestamp) -> StreamSnapshot {
        StreamSnapshot {
            id: self.id,
            asset: self.asset.clone(),
            payer: self.payer,
            payee: self.payee,
            deposit: self.deposit,
            rate_per_second: self.rate_per_second,
            start_time: self.start_time,
            stop_time: self.stop_time,
            withdrawn: self.withdrawn,
            halted: self.halted,
            terminated: self.terminated,
            earned: self.earned(now),
            withdrawable: self.withdrawable(now),
            remaining_runway_secs: self.remaining_runway(now),
            dormant: self.is_dormant(now),
        }
    }
}

/// What `get_stream` hands back: every stored field plus the derived figures
/// collaborators would otherwise recompute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamSnapshot {
    pub id: StreamId,
    pub asset: AssetId,
    pub payer: AccountId,
    pub payee: AccountId,
    pub deposit: Amount,
    pub rate_per_second: Amount,
    pub start_time: Timestamp,
    pub stop_time: Timestamp,
    pub withdrawn: Amount,
    pub halted: bool,
    pub terminated: bool,
    pub earned: Amount,
    pub withdrawable: Amount,
    pub remaining_runway_secs: u64,
    pub dormant: bool,
}
