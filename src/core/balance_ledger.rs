//! Balance ledger module
//!
//! This module provides the `BalanceLedger`, which implements every operation
//! that moves money and keeps the per-account snapshot history used for
//! point-in-time balance reconstruction.
//!
//! Balances live on the [`Account`](crate::types::Account) records owned by
//! [`AccountStore`]; the ledger borrows the store for each call. Every
//! operation validates all of its preconditions before touching any record,
//! so an error always leaves balances exactly as they were.
//!
//! Invariants maintained here:
//! - `balance >= 0` and `stake >= 0` for every account
//! - a successful transfer preserves `balance(from) + balance(to)`
//! - snapshots of an account are ordered by `taken_at`

use crate::core::account_store::{validate_id, AccountStore};
use crate::types::{
    AccountId, BalanceSnapshot, BurnRecord, LedgerError, LedgerResult, MintRecord,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

fn ensure_positive(operation: &str, amount: Decimal) -> LedgerResult<()> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::invalid_input(
            operation,
            format!("amount {} must be positive", amount),
        ));
    }
    Ok(())
}

/// Money movement and balance history
#[derive(Debug, Default)]
pub struct BalanceLedger {
    /// Snapshot series per account, oldest first
    snapshots: HashMap<AccountId, Vec<BalanceSnapshot>>,
    /// Maximum snapshots kept per account (0 = unlimited)
    retention: usize,
}

impl BalanceLedger {
    pub fn new(retention: usize) -> Self {
        BalanceLedger {
            snapshots: HashMap::new(),
            retention,
        }
    }

    /// Add funds to an account
    ///
    /// # Returns
    ///
    /// The balance after the credit.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if `amount <= 0`
    /// - `NotFound` if the account does not exist
    /// - `ArithmeticOverflow` if the balance would exceed the decimal range
    pub fn credit(
        &self,
        accounts: &mut AccountStore,
        id: &str,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> LedgerResult<Decimal> {
        ensure_positive("credit", amount)?;
        let account = accounts.get_mut(id)?;

        let new_balance = account
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("credit", id))?;

        account.balance = new_balance;
        account.updated_at = now;

        Ok(new_balance)
    }

    /// Remove funds from an account
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if `amount <= 0`
    /// - `NotFound` if the account does not exist
    /// - `InsufficientFunds` if the balance is lower than `amount`
    pub fn debit(
        &self,
        accounts: &mut AccountStore,
        id: &str,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> LedgerResult<Decimal> {
        ensure_positive("debit", amount)?;
        let account = accounts.get_mut(id)?;

        if account.balance < amount {
            return Err(LedgerError::insufficient_funds(id, account.balance, amount));
        }

        // Cannot underflow: balance >= amount was checked above
        let new_balance = account.balance - amount;
        account.balance = new_balance;
        account.updated_at = now;

        Ok(new_balance)
    }

    /// Move funds between two accounts
    ///
    /// Both accounts are resolved and every check is made before either
    /// balance changes, so the transfer is all-or-nothing. Callers hold the
    /// ledger lock for the whole call, which makes it atomic with respect to
    /// every other ledger operation.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if either id is blank, `from == to`, or `amount <= 0`
    /// - `NotFound` if either account does not exist
    /// - `InsufficientFunds` if `from` holds less than `amount`
    /// - `ArithmeticOverflow` if `to` would exceed the decimal range
    pub fn transfer(
        &self,
        accounts: &mut AccountStore,
        from: &str,
        to: &str,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> LedgerResult<()> {
        validate_id("transfer", from)?;
        validate_id("transfer", to)?;
        if from == to {
            return Err(LedgerError::invalid_input(
                "transfer",
                format!("source and destination are both '{}'", from),
            ));
        }
        ensure_positive("transfer", amount)?;

        let from_balance = accounts.get(from)?.balance;
        let to_balance = accounts.get(to)?.balance;

        if from_balance < amount {
            return Err(LedgerError::insufficient_funds(from, from_balance, amount));
        }

        let new_from = from_balance - amount;
        let new_to = to_balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("transfer", to))?;

        // All checks passed; commit both sides
        let source = accounts.get_mut(from)?;
        source.balance = new_from;
        source.updated_at = now;

        let destination = accounts.get_mut(to)?;
        destination.balance = new_to;
        destination.updated_at = now;

        Ok(())
    }

    /// Apply a signed adjustment to an account's balance
    ///
    /// A zero delta is accepted and only touches `updated_at`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the account does not exist
    /// - `InsufficientFunds` if the resulting balance would be negative
    /// - `ArithmeticOverflow` if the result exceeds the decimal range
    pub fn adjust_balance(
        &self,
        accounts: &mut AccountStore,
        id: &str,
        delta: Decimal,
        now: DateTime<Utc>,
    ) -> LedgerResult<Decimal> {
        let account = accounts.get_mut(id)?;

        let new_balance = account
            .balance
            .checked_add(delta)
            .ok_or_else(|| LedgerError::arithmetic_overflow("adjust_balance", id))?;

        if new_balance < Decimal::ZERO {
            return Err(LedgerError::insufficient_funds(
                id,
                account.balance,
                -delta,
            ));
        }

        account.balance = new_balance;
        account.updated_at = now;

        Ok(new_balance)
    }

    /// Move funds from the spendable balance into stake
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if `amount <= 0`
    /// - `NotFound` if the account does not exist
    /// - `InsufficientFunds` if the balance is lower than `amount`
    pub fn stake(
        &self,
        accounts: &mut AccountStore,
        id: &str,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> LedgerResult<()> {
        ensure_positive("stake", amount)?;
        let account = accounts.get_mut(id)?;

        if account.balance < amount {
            return Err(LedgerError::insufficient_funds(id, account.balance, amount));
        }

        let new_stake = account
            .stake
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("stake", id))?;

        account.balance -= amount;
        account.stake = new_stake;
        account.updated_at = now;

        Ok(())
    }

    /// Move funds from stake back into the spendable balance
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if `amount <= 0`
    /// - `NotFound` if the account does not exist
    /// - `InsufficientFunds` if the stake is lower than `amount`
    pub fn unstake(
        &self,
        accounts: &mut AccountStore,
        id: &str,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> LedgerResult<()> {
        ensure_positive("unstake", amount)?;
        let account = accounts.get_mut(id)?;

        if account.stake < amount {
            return Err(LedgerError::insufficient_funds(id, account.stake, amount));
        }

        let new_balance = account
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("unstake", id))?;

        account.stake -= amount;
        account.balance = new_balance;
        account.updated_at = now;

        Ok(())
    }

    /// Issue new funds into an account and record the mint
    pub fn mint(
        &self,
        accounts: &mut AccountStore,
        id: &str,
        amount: Decimal,
        reference: &str,
        now: DateTime<Utc>,
    ) -> LedgerResult<Decimal> {
        let new_balance = self.credit(accounts, id, amount, now)?;

        accounts.get_mut(id)?.mint_records.push(MintRecord {
            amount,
            reference: reference.to_string(),
            recorded_at: now,
        });

        Ok(new_balance)
    }

    /// Destroy funds from an account and record the burn
    pub fn burn(
        &self,
        accounts: &mut AccountStore,
        id: &str,
        amount: Decimal,
        reference: &str,
        now: DateTime<Utc>,
    ) -> LedgerResult<Decimal> {
        let new_balance = self.debit(accounts, id, amount, now)?;

        accounts.get_mut(id)?.burn_records.push(BurnRecord {
            amount,
            reference: reference.to_string(),
            recorded_at: now,
        });

        Ok(new_balance)
    }

    /// Record the account's current balance
    ///
    /// If `now` is earlier than the account's latest snapshot (a clock moved
    /// backwards), the new snapshot is stamped with the latest snapshot's
    /// time so the series stays ordered.
    ///
    /// # Errors
    ///
    /// `NotFound` if the account does not exist.
    pub fn save_snapshot(
        &mut self,
        accounts: &AccountStore,
        id: &str,
        now: DateTime<Utc>,
    ) -> LedgerResult<BalanceSnapshot> {
        let balance = accounts.get(id)?.balance;

        let series = self.snapshots.entry(id.to_string()).or_default();
        let taken_at = series
            .last()
            .map_or(now, |latest| latest.taken_at.max(now));

        let snapshot = BalanceSnapshot {
            account: id.to_string(),
            balance,
            taken_at,
        };
        series.push(snapshot.clone());

        if self.retention > 0 && series.len() > self.retention {
            let excess = series.len() - self.retention;
            series.drain(..excess);
        }

        Ok(snapshot)
    }

    /// Balance recorded by the latest snapshot taken at or before `at`
    ///
    /// An account that exists but has no qualifying snapshot is reported the
    /// same way as an unknown account: there is simply no snapshot.
    ///
    /// # Errors
    ///
    /// `SnapshotNotFound` if no snapshot of `id` has `taken_at <= at`.
    pub fn balance_at(&self, id: &str, at: DateTime<Utc>) -> LedgerResult<Decimal> {
        let series = self
            .snapshots
            .get(id)
            .ok_or_else(|| LedgerError::snapshot_not_found(id, at))?;

        let position = series.partition_point(|snapshot| snapshot.taken_at <= at);
        if position == 0 {
            return Err(LedgerError::snapshot_not_found(id, at));
        }

        Ok(series[position - 1].balance)
    }

    /// All snapshots of an account, oldest first
    ///
    /// # Errors
    ///
    /// `NotFound` if the account does not exist.
    pub fn balance_history(
        &self,
        accounts: &AccountStore,
        id: &str,
    ) -> LedgerResult<Vec<BalanceSnapshot>> {
        accounts.get(id)?;
        Ok(self.snapshots.get(id).cloned().unwrap_or_default())
    }

    /// Copy of every account's balance, keyed and ordered by account id
    ///
    /// An empty store yields an empty map.
    pub fn all_balances(&self, accounts: &AccountStore) -> BTreeMap<AccountId, Decimal> {
        accounts
            .all()
            .into_iter()
            .map(|account| (account.id.clone(), account.balance))
            .collect()
    }

    /// Sum of every account's spendable balance
    ///
    /// # Errors
    ///
    /// `ArithmeticOverflow` naming the first account whose balance pushes the
    /// sum past the decimal range. Each balance is representable on its own,
    /// but their sum need not be.
    pub fn total_balance(&self, accounts: &AccountStore) -> LedgerResult<Decimal> {
        accounts
            .all()
            .into_iter()
            .try_fold(Decimal::ZERO, |total, account| {
                total
                    .checked_add(account.balance)
                    .ok_or_else(|| LedgerError::arithmetic_overflow("total_balance", &account.id))
            })
    }
}
