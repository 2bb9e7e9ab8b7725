//! Wallet ledger facade
//!
//! This module provides the `Ledger`, the single entry point callers use.
//! It owns the account store, balance ledger, nonce allocator, multi-sig
//! wallet registry and identity store, and guards all of them with one
//! coarse-grained mutex.
//!
//! # Locking
//!
//! Every public method acquires the lock for its entire duration and releases
//! it on every exit path (the guard is scoped to the method). Operations on
//! one `Ledger` are therefore linearizable, `transfer` is atomic with respect
//! to every other operation, and `next_nonce` never hands out the same value
//! twice. The price is that unrelated operations (a credit to A and a debit
//! from B) are serialized; these are short in-memory operations.
//!
//! A panic while holding the lock does not leave partial state behind,
//! because every component validates before it mutates. A poisoned lock is
//! therefore recovered rather than propagated.
//!
//! # Value Semantics
//!
//! Reads return copies (`Account`, `MultiSigWallet`, `IdentityRecord`, ...);
//! no reference to internal state ever escapes the lock.

use crate::core::account_store::AccountStore;
use crate::core::balance_ledger::BalanceLedger;
use crate::core::config::LedgerConfig;
use crate::core::identity_store::IdentityStore;
use crate::core::multisig::MultiSigWalletRegistry;
use crate::core::nonce::NonceAllocator;
use crate::core::traits::{Clock, SystemClock};
use crate::types::{
    Account, AccountId, BalanceSnapshot, ConnectionKind, IdentityRecord, LedgerResult,
    MultiSigWallet,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Everything guarded by the ledger lock
#[derive(Debug)]
struct LedgerState {
    accounts: AccountStore,
    balances: BalanceLedger,
    nonces: NonceAllocator,
    wallets: MultiSigWalletRegistry,
    identities: IdentityStore,
}

/// In-process account and wallet ledger
///
/// Share it between threads behind an `Arc`; all methods take `&self`.
pub struct Ledger {
    state: Mutex<LedgerState>,
    clock: Arc<dyn Clock>,
    config: LedgerConfig,
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Log the outcome of a ledger call and pass the result through
fn logged<T>(operation: &str, subject: &str, result: LedgerResult<T>) -> LedgerResult<T> {
    match &result {
        Ok(_) => debug!(operation, subject, "ledger operation applied"),
        Err(e) => warn!(operation, subject, error = %e, "ledger operation rejected"),
    }
    result
}

impl Ledger {
    /// Create a ledger that reads time from the system clock
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the configuration does not validate.
    pub fn new(config: LedgerConfig) -> LedgerResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a ledger with an explicit clock
    pub fn with_clock(config: LedgerConfig, clock: Arc<dyn Clock>) -> LedgerResult<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, clock))
    }

    fn from_parts(config: LedgerConfig, clock: Arc<dyn Clock>) -> Self {
        info!(
            revocation_policy = ?config.revocation_policy,
            snapshot_retention = config.snapshot_retention,
            "ledger initialized"
        );
        Ledger {
            state: Mutex::new(LedgerState {
                accounts: AccountStore::new(),
                balances: BalanceLedger::new(config.snapshot_retention),
                nonces: NonceAllocator,
                wallets: MultiSigWalletRegistry::new(config.revocation_policy),
                identities: IdentityStore::new(),
            }),
            clock,
            config,
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Current time as seen by this ledger's clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn lock(&self) -> (MutexGuard<'_, LedgerState>, DateTime<Utc>) {
        let guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        // Read the clock under the lock so timestamps follow lock order
        let now = self.clock.now();
        (guard, now)
    }

    // ---------------------------------------------------------------------
    // Accounts
    // ---------------------------------------------------------------------

    /// Create an account from a caller-supplied initial record
    ///
    /// See [`AccountStore::create`] for the validation rules.
    pub fn create_account(&self, account: Account) -> LedgerResult<()> {
        let (mut state, now) = self.lock();
        let id = account.id.clone();
        let result = state.accounts.create(account, now);
        if result.is_ok() {
            info!(account = %id, "account created");
        }
        logged("create_account", &id, result)
    }

    /// Create an empty account
    pub fn open_account(&self, id: &str) -> LedgerResult<()> {
        self.create_account(Account::new(id))
    }

    /// Copy of an account record
    pub fn get_account(&self, id: &str) -> LedgerResult<Account> {
        let (state, _) = self.lock();
        state.accounts.get(id).cloned()
    }

    /// Replace an account record
    ///
    /// For read-modify-write, prefer the dedicated operations: a record read
    /// with `get_account` may be stale by the time it is written back.
    pub fn update_account(&self, account: Account) -> LedgerResult<()> {
        let (mut state, now) = self.lock();
        let id = account.id.clone();
        let result = state.accounts.update(account, now);
        logged("update_account", &id, result)
    }

    pub fn contains_account(&self, id: &str) -> bool {
        self.lock().0.accounts.contains(id)
    }

    pub fn account_count(&self) -> usize {
        self.lock().0.accounts.len()
    }

    /// Account identifiers in ascending order
    pub fn account_ids(&self) -> Vec<AccountId> {
        self.lock().0.accounts.ids()
    }

    /// Copies of all accounts, sorted by id
    pub fn accounts(&self) -> Vec<Account> {
        let (state, _) = self.lock();
        state.accounts.all().into_iter().cloned().collect()
    }

    // ---------------------------------------------------------------------
    // Balances
    // ---------------------------------------------------------------------

    pub fn balance(&self, id: &str) -> LedgerResult<Decimal> {
        let (state, _) = self.lock();
        Ok(state.accounts.get(id)?.balance)
    }

    /// Add funds; returns the new balance
    pub fn credit(&self, id: &str, amount: Decimal) -> LedgerResult<Decimal> {
        let (mut state, now) = self.lock();
        let state = &mut *state;
        let result = state.balances.credit(&mut state.accounts, id, amount, now);
        logged("credit", id, result)
    }

    /// Remove funds; returns the new balance
    pub fn debit(&self, id: &str, amount: Decimal) -> LedgerResult<Decimal> {
        let (mut state, now) = self.lock();
        let state = &mut *state;
        let result = state.balances.debit(&mut state.accounts, id, amount, now);
        logged("debit", id, result)
    }

    /// Atomically move `amount` from `from` to `to`
    pub fn transfer(&self, from: &str, to: &str, amount: Decimal) -> LedgerResult<()> {
        let (mut state, now) = self.lock();
        let state = &mut *state;
        let result = state
            .balances
            .transfer(&mut state.accounts, from, to, amount, now);
        match &result {
            Ok(()) => debug!(from, to, amount = %amount, "transfer committed"),
            Err(e) => warn!(from, to, amount = %amount, error = %e, "transfer rejected"),
        }
        result
    }

    /// Signed balance adjustment; returns the new balance
    pub fn adjust_balance(&self, id: &str, delta: Decimal) -> LedgerResult<Decimal> {
        let (mut state, now) = self.lock();
        let state = &mut *state;
        let result = state
            .balances
            .adjust_balance(&mut state.accounts, id, delta, now);
        logged("adjust_balance", id, result)
    }

    pub fn stake(&self, id: &str, amount: Decimal) -> LedgerResult<()> {
        let (mut state, now) = self.lock();
        let state = &mut *state;
        let result = state.balances.stake(&mut state.accounts, id, amount, now);
        logged("stake", id, result)
    }

    pub fn unstake(&self, id: &str, amount: Decimal) -> LedgerResult<()> {
        let (mut state, now) = self.lock();
        let state = &mut *state;
        let result = state.balances.unstake(&mut state.accounts, id, amount, now);
        logged("unstake", id, result)
    }

    /// Issue funds and append a mint record
    pub fn mint(&self, id: &str, amount: Decimal, reference: &str) -> LedgerResult<Decimal> {
        let (mut state, now) = self.lock();
        let state = &mut *state;
        let result = state
            .balances
            .mint(&mut state.accounts, id, amount, reference, now);
        logged("mint", id, result)
    }

    /// Destroy funds and append a burn record
    pub fn burn(&self, id: &str, amount: Decimal, reference: &str) -> LedgerResult<Decimal> {
        let (mut state, now) = self.lock();
        let state = &mut *state;
        let result = state
            .balances
            .burn(&mut state.accounts, id, amount, reference, now);
        logged("burn", id, result)
    }

    /// Record the account's current balance with the current time
    pub fn save_snapshot(&self, id: &str) -> LedgerResult<BalanceSnapshot> {
        let (mut state, now) = self.lock();
        let state = &mut *state;
        let result = state.balances.save_snapshot(&state.accounts, id, now);
        logged("save_snapshot", id, result)
    }

    /// Balance from the latest snapshot taken at or before `at`
    pub fn balance_at(&self, id: &str, at: DateTime<Utc>) -> LedgerResult<Decimal> {
        let (state, _) = self.lock();
        state.balances.balance_at(id, at)
    }

    /// All snapshots of an account, oldest first
    pub fn balance_history(&self, id: &str) -> LedgerResult<Vec<BalanceSnapshot>> {
        let (state, _) = self.lock();
        state.balances.balance_history(&state.accounts, id)
    }

    /// Point-in-time copy of every balance; empty when there are no accounts
    pub fn all_balances(&self) -> BTreeMap<AccountId, Decimal> {
        let (state, _) = self.lock();
        state.balances.all_balances(&state.accounts)
    }

    /// Sum of all spendable balances
    ///
    /// # Errors
    ///
    /// `ArithmeticOverflow` if the sum exceeds the decimal range.
    pub fn total_balance(&self) -> LedgerResult<Decimal> {
        let (state, _) = self.lock();
        state.balances.total_balance(&state.accounts)
    }

    // ---------------------------------------------------------------------
    // Nonces
    // ---------------------------------------------------------------------

    /// Commit and return the next nonce for `id`
    pub fn next_nonce(&self, id: &str) -> LedgerResult<u64> {
        let (mut state, now) = self.lock();
        let state = &mut *state;
        let result = state.nonces.next(&mut state.accounts, id, now);
        logged("next_nonce", id, result)
    }

    /// Last nonce issued for `id` (0 if none), without allocating
    pub fn current_nonce(&self, id: &str) -> LedgerResult<u64> {
        let (state, _) = self.lock();
        state.nonces.current(&state.accounts, id)
    }

    // ---------------------------------------------------------------------
    // Multi-signature wallets
    // ---------------------------------------------------------------------

    pub fn create_wallet<I, S>(&self, id: &str, owners: I, required: usize) -> LedgerResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<AccountId>,
    {
        let owners: Vec<AccountId> = owners.into_iter().map(Into::into).collect();
        let (mut state, now) = self.lock();
        let owner_count = owners.len();
        let result = state.wallets.create(id, owners, required, now);
        if result.is_ok() {
            info!(wallet = id, owners = owner_count, required, "multi-sig wallet created");
        }
        logged("create_wallet", id, result)
    }

    pub fn get_wallet(&self, id: &str) -> LedgerResult<MultiSigWallet> {
        let (state, _) = self.lock();
        state.wallets.get(id).cloned()
    }

    pub fn update_wallet<I, S>(&self, id: &str, owners: I, required: usize) -> LedgerResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<AccountId>,
    {
        let owners: Vec<AccountId> = owners.into_iter().map(Into::into).collect();
        let (mut state, now) = self.lock();
        let result = state.wallets.update(id, owners, required, now);
        logged("update_wallet", id, result)
    }

    /// Remove `owner` from the wallet; returns the wallet after the change
    pub fn revoke_signature(&self, id: &str, owner: &str) -> LedgerResult<MultiSigWallet> {
        let (mut state, now) = self.lock();
        let result = state.wallets.revoke(id, owner, now);
        if let Ok(wallet) = &result {
            info!(
                wallet = id,
                owner,
                required = wallet.required_signatures,
                remaining = wallet.owners.len(),
                "signer revoked"
            );
        }
        logged("revoke_signature", id, result)
    }

    /// Whether the distinct owners among `signers` meet the wallet threshold
    pub fn approvals_satisfied(&self, id: &str, signers: &[AccountId]) -> LedgerResult<bool> {
        let (state, _) = self.lock();
        state.wallets.approvals_satisfied(id, signers)
    }

    /// Whether `id` names a multi-signature wallet rather than an account
    pub fn is_multisig(&self, id: &str) -> bool {
        self.lock().0.wallets.contains(id)
    }

    // ---------------------------------------------------------------------
    // Identity and account sub-events
    // ---------------------------------------------------------------------

    pub fn get_identity(&self, id: &str) -> LedgerResult<IdentityRecord> {
        let (state, _) = self.lock();
        state.identities.get(id).cloned()
    }

    pub fn store_identity(
        &self,
        id: &str,
        public_key: &str,
        private_key_ref: &str,
    ) -> LedgerResult<()> {
        let (mut state, now) = self.lock();
        let state = &mut *state;
        let result =
            state
                .identities
                .store_identity(&state.accounts, id, public_key, private_key_ref, now);
        logged("store_identity", id, result)
    }

    pub fn log_recovery_setup(&self, id: &str, descriptor: &str) -> LedgerResult<()> {
        let (mut state, now) = self.lock();
        let state = &mut *state;
        let result = state
            .identities
            .log_recovery_setup(&state.accounts, id, descriptor, now);
        logged("log_recovery_setup", id, result)
    }

    pub fn store_wallet_key(&self, id: &str, encrypted_key: Vec<u8>) -> LedgerResult<()> {
        let (mut state, now) = self.lock();
        let state = &mut *state;
        let result = state
            .identities
            .store_wallet_key(&state.accounts, id, encrypted_key, now);
        logged("store_wallet_key", id, result)
    }

    pub fn set_custom_name(&self, id: &str, name: Option<&str>) -> LedgerResult<()> {
        let (mut state, now) = self.lock();
        let state = &mut *state;
        let result = state
            .identities
            .set_custom_name(&state.accounts, id, name, now);
        logged("set_custom_name", id, result)
    }

    pub fn update_verification_status(&self, id: &str, verified: bool) -> LedgerResult<()> {
        let (mut state, now) = self.lock();
        let state = &mut *state;
        let result =
            state
                .identities
                .update_verification_status(&mut state.accounts, id, verified, now);
        logged("update_verification_status", id, result)
    }

    pub fn record_connection_event(
        &self,
        id: &str,
        peer: &str,
        kind: ConnectionKind,
    ) -> LedgerResult<()> {
        let (mut state, now) = self.lock();
        let state = &mut *state;
        let result =
            state
                .identities
                .record_connection_event(&mut state.accounts, id, peer, kind, now);
        logged("record_connection_event", id, result)
    }

    pub fn record_currency_exchange(
        &self,
        id: &str,
        from_currency: &str,
        to_currency: &str,
        amount: Decimal,
        rate: Decimal,
    ) -> LedgerResult<()> {
        let (mut state, now) = self.lock();
        let result = state.accounts.record_currency_exchange(
            id,
            from_currency,
            to_currency,
            amount,
            rate,
            now,
        );
        logged("record_currency_exchange", id, result)
    }

    pub fn record_contract_execution(
        &self,
        id: &str,
        contract: &str,
        outcome: &str,
    ) -> LedgerResult<()> {
        let (mut state, now) = self.lock();
        let result = state
            .accounts
            .record_contract_execution(id, contract, outcome, now);
        logged("record_contract_execution", id, result)
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::from_parts(LedgerConfig::default(), Arc::new(SystemClock))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::RevocationPolicy;
    use crate::core::traits::ManualClock;
    use crate::types::{ErrorKind, LedgerError};
    use chrono::Duration;

    fn dec(value: i64) -> Decimal {
        Decimal::new(value, 0)
    }

    fn manual_ledger(config: LedgerConfig) -> (Ledger, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            DateTime::<Utc>::UNIX_EPOCH + Duration::days(19_000),
        ));
        let ledger = Ledger::with_clock(config, clock.clone()).unwrap();
        (ledger, clock)
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config =
            LedgerConfig::default().with_snapshot_retention(LedgerConfig::MAX_SNAPSHOT_RETENTION + 1);

        assert_eq!(Ledger::new(config).unwrap_err().kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_account_lifecycle_scenario() {
        let ledger = Ledger::default();

        ledger.open_account("B").unwrap();
        ledger.open_account("A").unwrap();
        assert_eq!(ledger.credit("A", dec(100)).unwrap(), dec(100));
        assert_eq!(ledger.account_ids(), vec!["A", "B"]);
        assert_eq!(ledger.account_count(), 2);

        ledger.transfer("A", "B", dec(40)).unwrap();
        assert_eq!(ledger.balance("A").unwrap(), dec(60));
        assert_eq!(ledger.balance("B").unwrap(), dec(40));

        let failed = ledger.transfer("A", "B", dec(1000));
        assert_eq!(failed.unwrap_err().kind(), ErrorKind::InsufficientFunds);
        assert_eq!(ledger.balance("A").unwrap(), dec(60));
        assert_eq!(ledger.balance("B").unwrap(), dec(40));
    }

    #[test]
    fn test_get_account_returns_copy() {
        let ledger = Ledger::default();
        ledger.open_account("A").unwrap();

        let mut copy = ledger.get_account("A").unwrap();
        copy.balance = dec(1_000_000);

        assert_eq!(ledger.balance("A").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_create_account_stamps_clock_time() {
        let (ledger, clock) = manual_ledger(LedgerConfig::default());

        ledger.open_account("A").unwrap();

        let account = ledger.get_account("A").unwrap();
        assert_eq!(account.created_at, clock.now());
    }

    #[test]
    fn test_update_account_read_modify_write() {
        let ledger = Ledger::default();
        ledger.open_account("A").unwrap();

        let mut account = ledger.get_account("A").unwrap();
        account.verified = true;
        ledger.update_account(account).unwrap();

        assert!(ledger.get_account("A").unwrap().verified);
        assert_eq!(
            ledger.update_account(Account::new("Z")).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_snapshots_follow_clock() {
        let (ledger, clock) = manual_ledger(LedgerConfig::default());
        ledger
            .create_account(Account::new("A").with_balance(dec(10)))
            .unwrap();

        let t1 = clock.now();
        ledger.save_snapshot("A").unwrap();
        clock.advance(Duration::minutes(5));
        ledger.credit("A", dec(5)).unwrap();
        let t2 = clock.now();
        ledger.save_snapshot("A").unwrap();
        clock.advance(Duration::minutes(5));
        ledger.credit("A", dec(5)).unwrap();
        let t3 = clock.now();
        ledger.save_snapshot("A").unwrap();

        assert_eq!(ledger.balance_at("A", t1).unwrap(), dec(10));
        assert_eq!(ledger.balance_at("A", t2).unwrap(), dec(15));
        assert_eq!(
            ledger.balance_at("A", t3 - Duration::seconds(1)).unwrap(),
            dec(15)
        );
        assert_eq!(ledger.balance_at("A", t3).unwrap(), dec(20));
        assert_eq!(ledger.balance_history("A").unwrap().len(), 3);
        assert!(matches!(
            ledger.balance_at("A", t1 - Duration::seconds(1)).unwrap_err(),
            LedgerError::SnapshotNotFound { .. }
        ));
    }

    #[test]
    fn test_all_balances_empty_ledger() {
        let ledger = Ledger::default();
        assert!(ledger.all_balances().is_empty());
    }

    #[test]
    fn test_nonce_sequence() {
        let ledger = Ledger::default();
        ledger.open_account("A").unwrap();

        assert_eq!(ledger.current_nonce("A").unwrap(), 0);
        assert_eq!(ledger.next_nonce("A").unwrap(), 1);
        assert_eq!(ledger.next_nonce("A").unwrap(), 2);
        assert_eq!(ledger.current_nonce("A").unwrap(), 2);
        assert_eq!(ledger.next_nonce("Z").unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_wallet_scenario_with_reject_policy() {
        let ledger = Ledger::default();

        ledger.create_wallet("w1", ["u1", "u2", "u3"], 2).unwrap();
        assert!(ledger.is_multisig("w1"));

        let wallet = ledger.revoke_signature("w1", "u1").unwrap();
        assert_eq!(wallet.owners, vec!["u2", "u3"]);
        assert_eq!(wallet.required_signatures, 2);

        let result = ledger.revoke_signature("w1", "u2");
        assert_eq!(result.unwrap_err().kind(), ErrorKind::InvariantViolation);
        assert_eq!(ledger.get_wallet("w1").unwrap().owners, vec!["u2", "u3"]);
    }

    #[test]
    fn test_wallet_scenario_with_lower_threshold_policy() {
        let (ledger, _) = manual_ledger(
            LedgerConfig::default().with_revocation_policy(RevocationPolicy::LowerThreshold),
        );

        ledger.create_wallet("w1", ["u1", "u2", "u3"], 2).unwrap();
        ledger.revoke_signature("w1", "u1").unwrap();
        let wallet = ledger.revoke_signature("w1", "u2").unwrap();

        assert_eq!(wallet.owners, vec!["u3"]);
        assert_eq!(wallet.required_signatures, 1);
    }

    #[test]
    fn test_identity_operations_through_ledger() {
        let ledger = Ledger::default();
        ledger.open_account("A").unwrap();

        ledger.store_identity("A", "pk", "vault://a").unwrap();
        ledger.log_recovery_setup("A", "social:3-of-5").unwrap();
        ledger.store_wallet_key("A", vec![1, 2, 3]).unwrap();
        ledger.set_custom_name("A", Some("Savings")).unwrap();
        ledger.update_verification_status("A", true).unwrap();
        ledger
            .record_connection_event("A", "peer-9", ConnectionKind::Connected)
            .unwrap();

        let identity = ledger.get_identity("A").unwrap();
        assert_eq!(identity.custom_name.as_deref(), Some("Savings"));
        assert!(identity.recovery.is_some());
        let account = ledger.get_account("A").unwrap();
        assert!(account.verified);
        assert_eq!(account.connection_events.len(), 1);
    }

    #[test]
    fn test_audit_records_through_ledger() {
        let ledger = Ledger::default();
        ledger.open_account("A").unwrap();

        ledger.mint("A", dec(10), "genesis").unwrap();
        ledger
            .record_currency_exchange("A", "USD", "EUR", dec(5), Decimal::new(92, 2))
            .unwrap();
        ledger
            .record_contract_execution("A", "escrow-v1", "settled")
            .unwrap();

        let account = ledger.get_account("A").unwrap();
        assert_eq!(account.balance, dec(10));
        assert_eq!(account.mint_records.len(), 1);
        assert_eq!(account.currency_exchanges.len(), 1);
        assert_eq!(account.contract_execution_logs.len(), 1);
    }

    #[test]
    fn test_total_balance_overflow_is_an_error() {
        let ledger = Ledger::default();
        for id in ["a", "b"] {
            ledger
                .create_account(Account::new(id).with_balance(Decimal::MAX))
                .unwrap();
        }

        let error = ledger.total_balance().unwrap_err();

        assert!(matches!(error, LedgerError::ArithmeticOverflow { .. }));
        // The lock is still usable afterwards
        assert_eq!(ledger.balance("a").unwrap(), Decimal::MAX);
    }

    /// Shared buffer the fmt subscriber writes into
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn capture_logs<F: FnOnce()>(f: F) -> String {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, f);

        let bytes = logs.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_transfer_logs_one_line_with_both_sides() {
        let ledger = Ledger::default();
        ledger
            .create_account(Account::new("A").with_balance(dec(100)))
            .unwrap();
        ledger.open_account("B").unwrap();

        let committed = capture_logs(|| ledger.transfer("A", "B", dec(40)).unwrap());
        let lines: Vec<&str> = committed.lines().collect();
        assert_eq!(lines.len(), 1, "{}", committed);
        assert!(lines[0].contains("transfer committed"));
        assert!(lines[0].contains("from="));
        assert!(lines[0].contains("to="));
        assert!(lines[0].contains("amount=40"));

        let rejected = capture_logs(|| {
            let _ = ledger.transfer("A", "B", dec(1000));
        });
        let lines: Vec<&str> = rejected.lines().collect();
        assert_eq!(lines.len(), 1, "{}", rejected);
        assert!(lines[0].contains("WARN"));
        assert!(lines[0].contains("transfer rejected"));
    }
}
