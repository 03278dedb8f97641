//! The asset-movement capability boundary.
//!
//! The ledger never touches balances directly: every transfer in or out of
//! custody goes through an [`AssetVault`]. Vaults must be atomic: a failed
//! transfer leaves every balance exactly as it was.

use meterstream_types::{AccountId, Amount};
use thiserror::Error;

/// Why a vault refused to move funds.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransferError {
    /// The source account does not hold enough spendable funds.
    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Amount, available: Amount },

    /// The source account has not approved enough for custody to pull.
    #[error("insufficient approval: need {needed}, approved {approved}")]
    InsufficientApproval { needed: Amount, approved: Amount },

    /// Custody does not hold enough to pay out. Should be unreachable when
    /// the ledger's conservation invariant holds.
    #[error("insufficient custody: need {needed}, held {held}")]
    InsufficientCustody { needed: Amount, held: Amount },

    /// A balance would exceed `u128` range.
    #[error("balance overflow")]
    Overflow,
}

/// Moves one asset between external accounts and ledger custody.
///
/// `move_in` pulls funds from an account into custody; `move_out` pays funds
/// from custody to an account. Either the whole transfer happens or nothing
/// does.
pub trait AssetVault {
    /// Pull `amount` from `from` into ledger custody.
    ///
    /// # Errors
    /// Returns a [`TransferError`] and changes nothing if `from` cannot
    /// cover `amount` (balance or, for token vaults, approval).
    fn move_in(&mut self, from: AccountId, amount: Amount) -> Result<(), TransferError>;

    /// Pay `amount` out of ledger custody to `to`.
    ///
    /// # Errors
    /// Returns a [`TransferError`] and changes nothing if custody cannot
    /// cover `amount` or the credit would overflow.
    fn move_out(&mut self, to: AccountId, amount: Amount) -> Result<(), TransferError>;

    /// Spendable funds `account` holds outside custody.
    fn balance_of(&self, account: AccountId) -> Amount;

    /// Total funds currently held in ledger custody.
    fn custody(&self) -> Amount;
}
