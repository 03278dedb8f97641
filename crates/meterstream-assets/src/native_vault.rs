//! Direct-debit vault for the ledger's base asset.

use std::collections::HashMap;

use meterstream_types::{AccountId, Amount};
use tracing::debug;

use crate::vault::{AssetVault, TransferError};

/// Custodies the native asset. No approval step: the host environment has
/// already authenticated the caller, so `move_in` debits directly.
pub struct NativeVault {
    balances: HashMap<AccountId, Amount>,
    custody: Amount,
}

impl NativeVault {
    /// Create a new empty vault.
    #[must_use]
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
            custody: Amount::ZERO,
        }
    }

    /// Credit spendable funds to an account.
    ///
    /// # Errors
    /// Returns `Overflow` if the account balance would exceed range.
    pub fn mint(&mut self, account: AccountId, amount: Amount) -> Result<(), TransferError> {
        let current = self.balance_of(account);
        let new_balance = current.checked_add(amount).ok_or(TransferError::Overflow)?;
        self.balances.insert(account, new_balance);
        Ok(())
    }
}

impl AssetVault for NativeVault {
    fn move_in(&mut self, from: AccountId, amount: Amount) -> Result<(), TransferError> {
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

        self.balances.insert(from, available - amount);
        self.custody = new_custody;
        debug!(from = %from.short(), amount = %amount, "Native funds debited into custody");
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
        debug!(to = %to.short(), amount = %amount, "Native funds paid out of custody");
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

impl Default for NativeVault {
    fn default() -> Self {
        Self::new()
    }
}
