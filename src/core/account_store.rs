//! Account storage module
//!
//! This module provides the `AccountStore` struct which owns the canonical
//! map of account identifiers to account records.
//!
//! The AccountStore is responsible for:
//! - Enforcing identifier uniqueness on creation
//! - Existence-checked lookup and full-record replacement
//! - Appending audit-only sub-events (currency exchanges, contract logs)
//! - Providing sorted account listings for reporting
//!
//! It performs no locking itself; the owning [`Ledger`](crate::core::Ledger)
//! serializes every call.

use crate::types::{
    Account, AccountId, ContractExecutionLog, CurrencyExchange, LedgerError, LedgerResult,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Reject empty or blank identifiers
pub(crate) fn validate_id(operation: &str, id: &str) -> LedgerResult<()> {
    if id.trim().is_empty() {
        return Err(LedgerError::invalid_input(
            operation,
            "identifier cannot be empty",
        ));
    }
    Ok(())
}

/// Owns all account records
#[derive(Debug, Default)]
pub struct AccountStore {
    accounts: HashMap<AccountId, Account>,
}

impl AccountStore {
    /// Create an empty store
    pub fn new() -> Self {
        AccountStore {
            accounts: HashMap::new(),
        }
    }

    /// Insert a new account
    ///
    /// The caller-supplied balance and stake are kept; creation and update
    /// timestamps are set to `now`.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the id is blank or the balance/stake is negative
    /// - `AlreadyExists` if the id is already present
    pub fn create(&mut self, mut account: Account, now: DateTime<Utc>) -> LedgerResult<()> {
        validate_id("create_account", &account.id)?;
        validate_amounts("create_account", &account)?;

        if self.accounts.contains_key(&account.id) {
            return Err(LedgerError::already_exists("Account", &account.id));
        }

        account.created_at = now;
        account.updated_at = now;
        self.accounts.insert(account.id.clone(), account);

        Ok(())
    }

    /// Borrow an account
    pub fn get(&self, id: &str) -> LedgerResult<&Account> {
        self.accounts
            .get(id)
            .ok_or_else(|| LedgerError::account_not_found(id))
    }

    /// Mutably borrow an account
    pub fn get_mut(&mut self, id: &str) -> LedgerResult<&mut Account> {
        self.accounts
            .get_mut(id)
            .ok_or_else(|| LedgerError::account_not_found(id))
    }

    /// Replace an existing account record
    ///
    /// `created_at` is preserved from the stored record and `updated_at` is
    /// set to `now`; every other field comes from `account`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the account does not exist
    /// - `InvalidInput` if the balance or stake is negative
    /// - `InvariantViolation` if the nonce would go backwards
    pub fn update(&mut self, mut account: Account, now: DateTime<Utc>) -> LedgerResult<()> {
        validate_id("update_account", &account.id)?;
        let current = self.get_mut(&account.id)?;
        validate_amounts("update_account", &account)?;

        if account.nonce < current.nonce {
            return Err(LedgerError::invariant_violation(
                &account.id,
                format!(
                    "nonce cannot decrease from {} to {}",
                    current.nonce, account.nonce
                ),
            ));
        }

        account.created_at = current.created_at;
        account.updated_at = now;
        *current = account;

        Ok(())
    }

    /// Append a currency exchange to the account's audit trail
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the currencies are blank or amount/rate are not positive
    /// - `NotFound` if the account does not exist
    pub fn record_currency_exchange(
        &mut self,
        id: &str,
        from_currency: &str,
        to_currency: &str,
        amount: Decimal,
        rate: Decimal,
        now: DateTime<Utc>,
    ) -> LedgerResult<()> {
        if from_currency.trim().is_empty() || to_currency.trim().is_empty() {
            return Err(LedgerError::invalid_input(
                "record_currency_exchange",
                "currency codes cannot be empty",
            ));
        }
        if amount <= Decimal::ZERO || rate <= Decimal::ZERO {
            return Err(LedgerError::invalid_input(
                "record_currency_exchange",
                format!("amount {} and rate {} must be positive", amount, rate),
            ));
        }

        let account = self.get_mut(id)?;
        account.currency_exchanges.push(CurrencyExchange {
            from_currency: from_currency.to_string(),
            to_currency: to_currency.to_string(),
            amount,
            rate,
            recorded_at: now,
        });
        account.updated_at = now;

        Ok(())
    }

    /// Append a contract execution log to the account
    pub fn record_contract_execution(
        &mut self,
        id: &str,
        contract: &str,
        outcome: &str,
        now: DateTime<Utc>,
    ) -> LedgerResult<()> {
        validate_id("record_contract_execution", contract)?;

        let account = self.get_mut(id)?;
        account.contract_execution_logs.push(ContractExecutionLog {
            contract: contract.to_string(),
            outcome: outcome.to_string(),
            recorded_at: now,
        });
        account.updated_at = now;

        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.accounts.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// All account identifiers, sorted
    pub fn ids(&self) -> Vec<AccountId> {
        let mut ids: Vec<AccountId> = self.accounts.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// All accounts sorted by identifier
    ///
    /// Sorting gives deterministic output for reports and replay.
    pub fn all(&self) -> Vec<&Account> {
        let mut accounts: Vec<&Account> = self.accounts.values().collect();
        accounts.sort_by(|a, b| a.id.cmp(&b.id));
        accounts
    }
}

fn validate_amounts(operation: &str, account: &Account) -> LedgerResult<()> {
    if account.balance < Decimal::ZERO {
        return Err(LedgerError::invalid_input(
            operation,
            format!("balance {} cannot be negative", account.balance),
        ));
    }
    if account.stake < Decimal::ZERO {
        return Err(LedgerError::invalid_input(
            operation,
            format!("stake {} cannot be negative", account.stake),
        ));
    }
    Ok(())
}
