//! Property tests for ledger-wide invariants.
//!
//! A synthetic workload drives one ledger through random operation
//! sequences under a monotone clock. After every step the structural
//! invariants must hold: `withdrawn <= deposit`, `stop_time >= start_time`,
//! one-way halted/terminated flags, custody conservation across the book,
//! the streams, and the vault, and a gapless journal. Rejected operations
//! must leave no trace at all.

use std::collections::HashMap;

use proptest::prelude::*;

use meterstream_assets::{NativeVault, VaultRegistry};
use meterstream_ledger::StreamLedger;
use meterstream_types::*;

const PAYER_FUNDS: u128 = 1_000_000_000;

fn actors() -> (AccountId, AccountId, AccountId) {
    (
        AccountId::from_bytes([0xA1; 32]),
        AccountId::from_bytes([0xB2; 32]),
        AccountId::from_bytes([0xC3; 32]),
    )
}

fn funded_ledger(authority: AccountId, payer: AccountId) -> StreamLedger {
    let mut vault = NativeVault::new();
    vault.mint(payer, Amount::new(PAYER_FUNDS)).unwrap();
    let mut vaults = VaultRegistry::new();
    vaults.register(AssetId::Native, vault);
    StreamLedger::new(LedgerConfig::new(authority), vaults)
}

/// One synthetic workload step: an operation selector and its parameters.
#[derive(Debug, Clone)]
struct Step {
    op: u8,
    dt: u64,
    amount: u128,
    rate: u128,
    target: usize,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    (0u8..5, 0u64..500, 1u128..10_000, 1u128..50, 0usize..16).prop_map(
        |(op, dt, amount, rate, target)| Step {
            op,
            dt,
            amount,
            rate,
            target,
        },
    )
}

fn pick(ids: &[StreamId], target: usize) -> Option<StreamId> {
    if ids.is_empty() {
        None
    } else {
        Some(ids[target % ids.len()])
    }
}

proptest! {
    /// Random operation sequences never break conservation or stream
    /// structure, and rejected operations leave no trace.
    #[test]
    fn random_workload_preserves_invariants(
        steps in proptest::collection::vec(step_strategy(), 1..60),
    ) {
        let (authority, payer, payee) = actors();
        let mut ledger = funded_ledger(authority, payer);
        let mut ids: Vec<StreamId> = Vec::new();
        let mut flags: HashMap<StreamId, (bool, bool)> = HashMap::new();
        let mut now = Timestamp::new(0);

        for step in steps {
            now = now.checked_add_secs(step.dt).unwrap();
            let journal_before = ledger.journal().len();
            let custody_before = ledger.custody_of(&AssetId::Native);

            let accepted = match step.op {
                0 => match ledger.create_stream(
                    payer,
                    AssetId::Native,
                    payee,
                    Amount::new(step.amount),
                    Amount::new(step.rate),
                    now,
                ) {
                    Ok(id) => {
                        ids.push(id);
                        true
                    }
                    Err(_) => false,
                },
                1 => pick(&ids, step.target)
                    .is_some_and(|id| ledger.withdraw(payee, id, now).is_ok()),
                2 => pick(&ids, step.target).is_some_and(|id| {
                    ledger
                        .top_up(payer, id, Amount::new(step.amount), now)
                        .is_ok()
                }),
                3 => pick(&ids, step.target)
                    .is_some_and(|id| ledger.halt_stream(authority, id, now).is_ok()),
                _ => pick(&ids, step.target)
                    .is_some_and(|id| ledger.terminate(payer, id, now).is_ok()),
            };

            if !accepted {
                prop_assert_eq!(
                    ledger.journal().len(),
                    journal_before,
                    "rejected op must not journal"
                );
                prop_assert_eq!(
                    ledger.custody_of(&AssetId::Native),
                    custody_before,
                    "rejected op must not move funds"
                );
            }

            // Structural invariants on every live stream.
            for &id in &ids {
                let snap = ledger.get_stream(id, now).unwrap();
                prop_assert!(
                    snap.withdrawn <= snap.deposit,
                    "stream {}: withdrawn {} > deposit {}",
                    id, snap.withdrawn, snap.deposit
                );
                prop_assert!(
                    snap.stop_time >= snap.start_time,
                    "stream {}: stop {} < start {}",
                    id, snap.stop_time, snap.start_time
                );
                prop_assert!(snap.earned <= snap.deposit);
                prop_assert!(snap.withdrawable <= snap.earned);

                // Halted and terminated are one-way.
                let (was_halted, was_terminated) =
                    flags.get(&id).copied().unwrap_or((false, false));
                prop_assert!(!was_halted || snap.halted, "halted flag reverted");
                prop_assert!(
                    !was_terminated || snap.terminated,
                    "terminated flag reverted"
                );
                flags.insert(id, (snap.halted, snap.terminated));
            }

            // The book, the streams, and the vault agree.
            let custody_check = ledger.verify_custody(&AssetId::Native);
            prop_assert!(custody_check.is_ok(), "custody diverged: {custody_check:?}");

            // Nothing enters or leaves the system as a whole.
            let vault = ledger.vault(&AssetId::Native).unwrap();
            let total = vault.balance_of(payer).raw()
                + vault.balance_of(payee).raw()
                + vault.custody().raw();
            prop_assert_eq!(total, PAYER_FUNDS, "system total changed");
        }

        // The journal is gapless from genesis.
        for (i, entry) in ledger.journal().entries().iter().enumerate() {
            prop_assert_eq!(entry.seq, i as u64);
        }
    }

    /// Repeated withdrawals pay out exactly the accrual, never more.
    #[test]
    fn withdrawals_sum_to_accrual(
        deposit in 1u128..1_000_000,
        rate in 1u128..1_000,
        instants in proptest::collection::vec(0u64..5_000, 1..20),
    ) {
        if deposit >= rate {
            let (authority, payer, payee) = actors();
            let mut ledger = funded_ledger(authority, payer);
            let id = ledger
                .create_stream(
                    payer,
                    AssetId::Native,
                    payee,
                    Amount::new(deposit),
                    Amount::new(rate),
                    Timestamp::new(0),
                )
                .unwrap();

            let mut sorted = instants;
            sorted.sort_unstable();
            let mut paid_total = 0u128;
            for &t in &sorted {
                if let Ok(paid) = ledger.withdraw(payee, id, Timestamp::new(t)) {
                    paid_total += paid.raw();
                }
            }

            // Total paid equals the per-second accrual at the last instant,
            // clamped to the runway bought by the deposit.
            let runway = deposit / rate;
            let last = u128::from(*sorted.last().unwrap());
            prop_assert_eq!(paid_total, rate * last.min(runway));
            prop_assert!(paid_total <= deposit);
            prop_assert!(ledger.verify_custody(&AssetId::Native).is_ok());
        }
    }

    /// Termination splits the deposit exactly between refund and accrual.
    #[test]
    fn terminate_splits_deposit_exactly(
        deposit in 1u128..1_000_000,
        rate in 1u128..1_000,
        t_end in 0u64..5_000,
    ) {
        if deposit >= rate {
            let (authority, payer, payee) = actors();
            let mut ledger = funded_ledger(authority, payer);
            let id = ledger
                .create_stream(
                    payer,
                    AssetId::Native,
                    payee,
                    Amount::new(deposit),
                    Amount::new(rate),
                    Timestamp::new(0),
                )
                .unwrap();

            let refund = ledger
                .terminate(payer, id, Timestamp::new(t_end))
                .unwrap();
            let snap = ledger.get_stream(id, Timestamp::new(t_end)).unwrap();
            prop_assert_eq!(refund.raw() + snap.deposit.raw(), deposit);

            // Whatever was earned remains fully withdrawable.
            if !snap.deposit.is_zero() {
                let paid = ledger
                    .withdraw(payee, id, Timestamp::new(t_end))
                    .unwrap();
                prop_assert_eq!(paid, snap.deposit);
            }

            let vault = ledger.vault(&AssetId::Native).unwrap();
            prop_assert_eq!(vault.custody(), Amount::ZERO);
            prop_assert_eq!(
                vault.balance_of(payer).raw() + vault.balance_of(payee).raw(),
                PAYER_FUNDS
            );
        }
    }
}
