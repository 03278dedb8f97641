//! ERC-20-style vault: pull-payment with explicit approvals.

use std::collections::HashMap;

use meterstream_types::{AccountId, Amount};
use tracing::debug;

use crate::vault::{AssetVault, TransferError};

/// Custodies one token asset with balance + approval accounting.
///
/// Funding a stream is a pull: the payer first `approve`s an allowance
/// toward custody, then the ledger's `move_in` consumes balance and
/// allowance together. Payouts via `move_out` need no approval.
pub struct TokenVault {
    /// Spendable funds per account, outside custody.
    balances: HashMap<AccountId, Amount>,
    /// Standing allowance each account has granted custody.
    approvals: HashMap<AccountId, Amount>,
    /// Total held by the ledger.
    custody: Amount,
}

impl TokenVault {
    /// Create a new empty vault.
    #[must_use]
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
            approvals: HashMap::new(),
            custody: Amount::ZERO,
        }
    }

    /// Credit freshly issued funds to an account.
    ///
    /// # Errors
    /// Returns `Overflow` if the account balance would exceed range.
    pub fn mint(&mut self, account: AccountId, amount: Amount) -> Result<(), TransferError> {
        let current = self.balance_of(account);
        let new_balance = current.checked_add(amount).ok_or(TransferError::Overflow)?;
        self.balances.insert(account, new_balance);
        Ok(())
    }

    /// Set (not add to) the allowance `owner` grants custody.
    pub fn approve(&mut self, owner: AccountId, amount: Amount) {
        self.approvals.insert(owner, amount);
    }

    /// The allowance `owner` currently grants custody.
    #[must_use]
    pub fn approval_of(&self, owner: AccountId) -> Amount {
        self.approvals.get(&owner).copied().unwrap_or(Amount::ZERO)
    }
}

impl AssetVault for TokenVault {
    fn move_in(&mut self, from: AccountId, amount: Amount) -> Result<(), TransferError> {
        let approved = self.approval_of(from);
        if approved < amount {
            return Err(TransferError::InsufficientApproval {
                needed: amount,
                approved,
            });
        }
        let available = self.balance_of(from);
        if available < amount {
            return Err(TransferError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        let new_custody = self
            .custody
            .checked_add(amount)
            .ok_or(TransferError::Overflow)?;

        // All checks passed: commit the full transfer.
        self.approvals.insert(from, approved - amount);
        self.balances.insert(from, available - amount);
        self.custody = new_custody;
        debug!(from = %from.short(), amount = %amount, "Funds pulled into custody");
        Ok(())
    }

    fn move_out(&mut self, to: AccountId, amount: Amount) -> Result<(), TransferError> {
        if self.custody < amount {
            return Err(TransferError::InsufficientCustody {
                needed: amount,
                held: self.custody,
            });
        }
        let new_balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TransferError::Overflow)?;

        self.custody = self.custody - amount;
        self.balances.insert(to, new_balance);
        debug!(to = %to.short(), amount = %amount, "Funds paid out of custody");
        Ok(())
    }

    fn balance_of(&self, account: AccountId) -> Amount {
        self.balances
            .get(&account)
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    fn custody(&self) -> Amount {
        self.custody
    }
}

impl Default for TokenVault {
    fn default() -> Self {
        Self::new()
    }
}
