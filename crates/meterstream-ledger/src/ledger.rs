//! The stream ledger state machine.
//!
//! One `StreamLedger` owns all stream state, the per-asset vaults, the
//! custody book, and the record journal. Every operation runs in three
//! phases:
//! 1. Validate and precompute: all checks and checked arithmetic up front
//! 2. Transfer: at most one vault movement per operation
//! 3. Commit: infallible state writes, custody bookkeeping, journal append
//!
//! A failure in phase 1 or 2 leaves zero observable change; phase 3 cannot
//! fail. The host environment serializes calls, so two withdrawals can never
//! pay out the same accrual twice: the first commits `withdrawn` before the
//! second computes its payable.

use meterstream_assets::{AssetVault, VaultRegistry};
use meterstream_types::{
    constants, AccountId, Amount, AssetId, LedgerConfig, LedgerError, Result, Stream,
    StreamId, StreamRecord, StreamSnapshot, Timestamp,
};

use crate::custody::CustodyBook;
use crate::journal::RecordJournal;
use crate::registry::StreamRegistry;

/// Time-based payment-streaming ledger.
///
/// Payers escrow a deposit that the payee earns at a fixed per-second rate;
/// the designated Halting Authority can freeze further funding. All time
/// comes from the caller: the ledger never reads a clock.
pub struct StreamLedger {
    config: LedgerConfig,
    streams: StreamRegistry,
    vaults: VaultRegistry,
    custody: CustodyBook,
    journal: RecordJournal,
}

impl StreamLedger {
    /// Create a ledger with the given configuration and vaults.
    #[must_use]
    pub fn new(config: LedgerConfig, vaults: VaultRegistry) -> Self {
        Self {
            config,
            streams: StreamRegistry::new(),
            vaults,
            custody: CustodyBook::new(),
            journal: RecordJournal::new(),
        }
    }

    /// Register a vault for an asset after construction.
    pub fn register_vault(&mut self, asset: AssetId, vault: impl AssetVault + 'static) {
        self.vaults.register(asset, vault);
    }

    /// The single principal allowed to halt streams.
    #[must_use]
    pub fn halting_authority(&self) -> AccountId {
        self.config.halting_authority
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Open a new stream: escrow `deposit` from `payer` and start paying
    /// `payee` at `rate_per_second` from `now`.
    ///
    /// `stop_time` is `now + deposit / rate` (floor division); a sub-second
    /// remainder stays in escrow as dust, reclaimable via [`Self::terminate`].
    ///
    /// # Errors
    /// - `InvalidDeposit` for a zero deposit or one that buys zero seconds
    /// - `InvalidRate` for a zero rate
    /// - `InvalidPayee` for a null payee or `payer == payee`
    /// - `FundsTransferFailed` if the vault cannot pull the deposit
    /// - `AmountOverflow` if the duration or stop time exceeds range
    pub fn create_stream(
        &mut self,
        payer: AccountId,
        asset: AssetId,
        payee: AccountId,
        deposit: Amount,
        rate_per_second: Amount,
        now: Timestamp,
    ) -> Result<StreamId> {
        if deposit.is_zero() {
            return Err(LedgerError::InvalidDeposit {
                reason: "deposit must be greater than zero".into(),
            });
        }
        if rate_per_second.is_zero() {
            return Err(LedgerError::InvalidRate);
        }
        if payee.is_null() {
            return Err(LedgerError::InvalidPayee {
                reason: "payee is the null principal".into(),
            });
        }
        if payee == payer {
            return Err(LedgerError::InvalidPayee {
                reason: "payer and payee must be distinct".into(),
            });
        }
        let duration =
            deposit
                .whole_seconds_at(rate_per_second)
                .ok_or_else(|| LedgerError::AmountOverflow {
                    context: "stream duration".into(),
                })?;
        if duration < constants::MIN_STREAM_SECONDS {
            return Err(LedgerError::InvalidDeposit {
                reason: format!(
                    "deposit {deposit} buys zero whole seconds at rate {rate_per_second}"
                ),
            });
        }
        let stop_time =
            now.checked_add_secs(duration)
                .ok_or_else(|| LedgerError::AmountOverflow {
                    context: "stop time".into(),
                })?;

        self.vault_mut(&asset)?
            .move_in(payer, deposit)
            .map_err(|e| LedgerError::FundsTransferFailed {
                reason: e.to_string(),
            })?;

        let id = self.streams.allocate_id();
        self.streams.insert(Stream::open(
            id,
            asset.clone(),
            payer,
            payee,
            deposit,
            rate_per_second,
            now,
            stop_time,
        ));
        self.custody.record_inflow(&asset, deposit);
        self.journal.append(
            now,
            StreamRecord::Created {
                stream_id: id,
                payer,
                payee,
                asset: asset.clone(),
                deposit,
                rate_per_second,
                start_time: now,
                stop_time,
            },
        );
        tracing::info!(
            stream = %id,
            payer = %payer,
            payee = %payee,
            asset = %asset,
            deposit = %deposit,
            rate = %rate_per_second,
            stop = %stop_time,
            "Stream created"
        );
        Ok(id)
    }

    /// Pay the payee everything they have earned but not yet withdrawn.
    ///
    /// Never blocked by `halted` or `terminated`, and keeps working after
    /// `stop_time`: a halt freezes future funding, never earned balance.
    /// Returns the amount paid.
    ///
    /// # Errors
    /// - `Unauthorized` if `caller` is not the stream's payee
    /// - `StreamNotFound` for an unknown id
    /// - `NothingToWithdraw` if nothing has accrued since the last call
    /// - `FundsTransferFailed` if the vault cannot pay out
    pub fn withdraw(
        &mut self,
        caller: AccountId,
        stream_id: StreamId,
        now: Timestamp,
    ) -> Result<Amount> {
        let stream = self.streams.get(stream_id)?;
        if caller != stream.payee {
            return Err(LedgerError::Unauthorized {
                required_role: "stream payee".into(),
            });
        }
        let payable = stream.withdrawable(now);
        if payable.is_zero() {
            return Err(LedgerError::NothingToWithdraw(stream_id));
        }
        let payee = stream.payee;
        let asset = stream.asset.clone();
        let new_withdrawn =
            stream
                .withdrawn
                .checked_add(payable)
                .ok_or_else(|| LedgerError::AmountOverflow {
                    context: "withdrawn total".into(),
                })?;

        self.vault_mut(&asset)?
            .move_out(payee, payable)
            .map_err(|e| LedgerError::FundsTransferFailed {
                reason: e.to_string(),
            })?;

        self.streams.get_mut(stream_id)?.withdrawn = new_withdrawn;
        self.custody.record_outflow(&asset, payable);
        self.journal.append(
            now,
            StreamRecord::Withdrawn {
                stream_id,
                amount: payable,
                payee,
            },
        );
        tracing::info!(
            stream = %stream_id,
            payee = %payee,
            amount = %payable,
            "Withdrawal paid"
        );
        Ok(payable)
    }

    /// Add `added` to a stream's escrow, extending `stop_time` by
    /// `added / rate` whole seconds. Any funded caller may top up.
    /// Returns the new stop time.
    ///
    /// # Errors
    /// - `StreamNotFound` for an unknown id
    /// - `StreamHalted` / `StreamTerminated` once funding is frozen
    /// - `InvalidDeposit` for a zero top-up or one that buys zero seconds
    /// - `FundsTransferFailed` if the vault cannot pull the funds
    /// - `AmountOverflow` if the new deposit or stop time exceeds range
    pub fn top_up(
        &mut self,
        caller: AccountId,
        stream_id: StreamId,
        added: Amount,
        now: Timestamp,
    ) -> Result<Timestamp> {
        let stream = self.streams.get(stream_id)?;
        if stream.halted {
            return Err(LedgerError::StreamHalted(stream_id));
        }
        if stream.terminated {
            return Err(LedgerError::StreamTerminated(stream_id));
        }
        if added.is_zero() {
            return Err(LedgerError::InvalidDeposit {
                reason: "top-up must be greater than zero".into(),
            });
        }
        let added_secs = added
            .whole_seconds_at(stream.rate_per_second)
            .ok_or_else(|| LedgerError::AmountOverflow {
                context: "top-up duration".into(),
            })?;
        if added_secs < constants::MIN_STREAM_SECONDS {
            return Err(LedgerError::InvalidDeposit {
                reason: format!(
                    "top-up {added} buys zero whole seconds at rate {}",
                    stream.rate_per_second
                ),
            });
        }
        let new_deposit =
            stream
                .deposit
                .checked_add(added)
                .ok_or_else(|| LedgerError::AmountOverflow {
                    context: "deposit total".into(),
                })?;
        let new_stop =
            stream
                .stop_time
                .checked_add_secs(added_secs)
                .ok_or_else(|| LedgerError::AmountOverflow {
                    context: "stop time".into(),
                })?;
        let asset = stream.asset.clone();

        self.vault_mut(&asset)?
            .move_in(caller, added)
            .map_err(|e| LedgerError::FundsTransferFailed {
                reason: e.to_string(),
            })?;

        let stream = self.streams.get_mut(stream_id)?;
        stream.deposit = new_deposit;
        stream.stop_time = new_stop;
        self.custody.record_inflow(&asset, added);
        self.journal.append(
            now,
            StreamRecord::ToppedUp {
                stream_id,
                added,
                new_stop_time: new_stop,
            },
        );
        tracing::info!(
            stream = %stream_id,
            added = %added,
            new_stop = %new_stop,
            "Stream topped up"
        );
        Ok(new_stop)
    }

    /// Freeze a stream's funding. Halting Authority only.
    ///
    /// Halting is terminal and idempotent: re-halting an already-halted
    /// stream succeeds without journaling a second record. Earned balance
    /// stays withdrawable.
    ///
    /// # Errors
    /// - `Unauthorized` if `caller` is not the Halting Authority
    /// - `StreamNotFound` for an unknown id
    pub fn halt_stream(
        &mut self,
        caller: AccountId,
        stream_id: StreamId,
        now: Timestamp,
    ) -> Result<()> {
        if caller != self.config.halting_authority {
            return Err(LedgerError::Unauthorized {
                required_role: "halting authority".into(),
            });
        }
        let stream = self.streams.get_mut(stream_id)?;
        if stream.halted {
            tracing::debug!(stream = %stream_id, "Stream already halted");
            return Ok(());
        }
        stream.halted = true;
        self.journal
            .append(now, StreamRecord::Halted { stream_id });
        tracing::warn!(
            stream = %stream_id,
            "Stream halted: no further funding permitted"
        );
        Ok(())
    }

    /// End a stream early, refunding the payer everything not yet earned.
    /// Payer only. Returns the refund.
    ///
    /// The payee's earned balance is untouched and stays withdrawable
    /// forever; `deposit` shrinks to exactly what was earned and
    /// `stop_time` is pulled in to `min(now, stop_time)`. A halted stream
    /// cannot be terminated: once the authority freezes a stream, its
    /// escrow schedule plays out to `stop_time`.
    ///
    /// # Errors
    /// - `Unauthorized` if `caller` is not the stream's payer
    /// - `StreamNotFound` for an unknown id
    /// - `StreamHalted` / `StreamTerminated` once the lifecycle is frozen
    /// - `FundsTransferFailed` if the vault cannot pay the refund
    pub fn terminate(
        &mut self,
        caller: AccountId,
        stream_id: StreamId,
        now: Timestamp,
    ) -> Result<Amount> {
        let stream = self.streams.get(stream_id)?;
        if caller != stream.payer {
            return Err(LedgerError::Unauthorized {
                required_role: "stream payer".into(),
            });
        }
        if stream.halted {
            return Err(LedgerError::StreamHalted(stream_id));
        }
        if stream.terminated {
            return Err(LedgerError::StreamTerminated(stream_id));
        }
        // Clamped to the accrual window so stop_time never precedes
        // start_time.
        let effective_now = stream.accrued_until(now).max(stream.start_time);
        let earned = stream.earned(now);
        let refund = stream.deposit.saturating_sub(earned);
        let payer = stream.payer;
        let asset = stream.asset.clone();

        if !refund.is_zero() {
            self.vault_mut(&asset)?
                .move_out(payer, refund)
                .map_err(|e| LedgerError::FundsTransferFailed {
                    reason: e.to_string(),
                })?;
        }

        let stream = self.streams.get_mut(stream_id)?;
        stream.deposit = earned;
        stream.stop_time = effective_now;
        stream.terminated = true;
        if !refund.is_zero() {
            self.custody.record_outflow(&asset, refund);
        }
        self.journal.append(
            now,
            StreamRecord::Terminated {
                stream_id,
                refund,
                stop_time: effective_now,
            },
        );
        tracing::info!(
            stream = %stream_id,
            payer = %payer,
            refund = %refund,
            stop = %effective_now,
            "Stream terminated by payer"
        );
        Ok(refund)
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// Point-in-time view of a stream, including derived accrual figures.
    ///
    /// # Errors
    /// Returns `StreamNotFound` for an unknown id.
    pub fn get_stream(&self, stream_id: StreamId, now: Timestamp) -> Result<StreamSnapshot> {
        self.streams.get(stream_id).map(|s| s.snapshot(now))
    }

    /// Number of streams ever created.
    #[must_use]
    pub fn stream_count(&self) -> usize {
        self.streams.len()
    }

    /// The append-only audit trail.
    #[must_use]
    pub fn journal(&self) -> &RecordJournal {
        &self.journal
    }

    /// Expected custody for an asset according to the books.
    #[must_use]
    pub fn custody_of(&self, asset: &AssetId) -> Amount {
        self.custody.expected_custody(asset)
    }

    /// Read-only access to an asset's vault.
    #[must_use]
    pub fn vault(&self, asset: &AssetId) -> Option<&dyn AssetVault> {
        self.vaults.get(asset)
    }

    /// Verify custody conservation for an asset: the custody book, the sum
    /// of unwithdrawn escrow across streams, and the vault's actual custody
    /// must all agree.
    ///
    /// # Errors
    /// Returns `CustodyInvariantViolation` on any mismatch.
    pub fn verify_custody(&self, asset: &AssetId) -> Result<()> {
        let expected = self.custody.expected_custody(asset);
        let escrow = self.streams.total_escrow(asset);
        if expected != escrow {
            return Err(LedgerError::CustodyInvariantViolation {
                reason: format!(
                    "Asset {asset}: book custody {expected} != stream escrow {escrow}"
                ),
            });
        }
        if let Some(vault) = self.vaults.get(asset) {
            self.custody.verify(asset, vault.custody())?;
        }
        Ok(())
    }

    fn vault_mut(&mut self, asset: &AssetId) -> Result<&mut dyn AssetVault> {
        self.vaults
            .get_mut(asset)
            .ok_or_else(|| LedgerError::FundsTransferFailed {
                reason: format!("no vault registered for {asset}"),
            })
    }
}
