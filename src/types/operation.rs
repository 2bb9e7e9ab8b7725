//! Ledger operation types used by the replay layer
//!
//! A replayed operation script is a sequence of [`OperationRecord`]s. Each
//! record names one ledger call and carries its arguments; the meaning of
//! `target` and `amount` depends on the operation type.

use super::account::AccountId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Operations a replay script can invoke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    /// Create an account, optionally with an opening balance
    Open,
    /// Add funds to an account
    Credit,
    /// Remove funds from an account
    Debit,
    /// Move funds from `account` to `target`
    Transfer,
    /// Signed balance adjustment
    Adjust,
    /// Move funds from balance into stake
    Stake,
    /// Move funds from stake back into balance
    Unstake,
    /// Issue funds, recording a mint with `target` as reference
    Mint,
    /// Destroy funds, recording a burn with `target` as reference
    Burn,
    /// Record the current balance
    Snapshot,
    /// Allocate the next nonce
    Nonce,
    /// Register a multi-sig wallet; owners in `target`, threshold in `amount`
    Wallet,
    /// Remove owner `target` from wallet `account`
    Revoke,
    /// Mark the account's identity as verified
    Verify,
}

impl OperationType {
    /// Whether the operation cannot be replayed without an amount
    pub fn requires_amount(self) -> bool {
        matches!(
            self,
            OperationType::Credit
                | OperationType::Debit
                | OperationType::Transfer
                | OperationType::Adjust
                | OperationType::Stake
                | OperationType::Unstake
                | OperationType::Mint
                | OperationType::Burn
                | OperationType::Wallet
        )
    }

    /// Whether the operation cannot be replayed without a target
    pub fn requires_target(self) -> bool {
        matches!(
            self,
            OperationType::Transfer | OperationType::Wallet | OperationType::Revoke
        )
    }
}

/// One parsed row of an operation script
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRecord {
    pub op: OperationType,

    /// Account (or wallet, for `wallet`/`revoke`) the operation applies to
    pub account: AccountId,

    /// Counterparty, owner list or reference, depending on `op`
    pub target: Option<String>,

    pub amount: Option<Decimal>,

    /// Moment the operation happened; advances the replay clock when present
    pub at: Option<DateTime<Utc>>,
}
