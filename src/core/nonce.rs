//! Per-account sequence numbers for outgoing operations
//!
//! `NonceAllocator::next` commits the increment before returning, so as long
//! as callers hold the ledger lock two callers can never observe the same
//! value.

use crate::core::account_store::AccountStore;
use crate::types::{LedgerError, LedgerResult};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, Default)]
pub struct NonceAllocator;

impl NonceAllocator {
    /// Issue and commit the next nonce for `id`
    ///
    /// # Errors
    ///
    /// - `NotFound` if the account does not exist
    /// - `ArithmeticOverflow` if the counter is exhausted
    pub fn next(
        &self,
        accounts: &mut AccountStore,
        id: &str,
        now: DateTime<Utc>,
    ) -> LedgerResult<u64> {
        let account = accounts.get_mut(id)?;

        let next = account
            .nonce
            .checked_add(1)
            .ok_or_else(|| LedgerError::arithmetic_overflow("next_nonce", id))?;

        account.nonce = next;
        account.updated_at = now;

        Ok(next)
    }

    /// Last nonce issued for `id`, without allocating (0 if none yet)
    pub fn current(&self, accounts: &AccountStore, id: &str) -> LedgerResult<u64> {
        Ok(accounts.get(id)?.nonce)
    }
}
