//! Account-related types for the wallet ledger
//!
//! This module defines the Account record and the append-only sub-event
//! records each account owns (mints, burns, currency exchanges, connection
//! events and contract execution logs).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Account identifier
///
/// Any non-blank string. Wallet identifiers share the same namespace shape
/// but live in their own registry.
pub type AccountId = String;

/// Balance-bearing identity with a monotonic nonce
///
/// Values of this type handed out by the ledger are copies; mutating them has
/// no effect until they are written back through `Ledger::update_account`.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Unique account identifier
    pub id: AccountId,

    /// Spendable funds, never negative
    pub balance: Decimal,

    /// Funds locked as stake, never negative
    ///
    /// Staked funds are not part of `balance` and cannot be debited or
    /// transferred until they are unstaked.
    pub stake: Decimal,

    /// Last sequence number issued for this account's outgoing operations
    ///
    /// Starts at 0; the first allocated nonce is 1.
    pub nonce: u64,

    /// Whether the account's identity has been verified
    pub verified: bool,

    pub mint_records: Vec<MintRecord>,
    pub burn_records: Vec<BurnRecord>,
    pub currency_exchanges: Vec<CurrencyExchange>,
    pub connection_events: Vec<ConnectionEvent>,
    pub contract_execution_logs: Vec<ContractExecutionLog>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with zero balance, zero stake and nonce 0
    ///
    /// Timestamps are placeholders; the ledger stamps them with its clock
    /// when the account is created.
    pub fn new(id: impl Into<AccountId>) -> Self {
        let now = DateTime::<Utc>::UNIX_EPOCH;
        Account {
            id: id.into(),
            balance: Decimal::ZERO,
            stake: Decimal::ZERO,
            nonce: 0,
            verified: false,
            mint_records: Vec::new(),
            burn_records: Vec::new(),
            currency_exchanges: Vec::new(),
            connection_events: Vec::new(),
            contract_execution_logs: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the opening balance
    pub fn with_balance(mut self, balance: Decimal) -> Self {
        self.balance = balance;
        self
    }

    /// Set the opening stake
    pub fn with_stake(mut self, stake: Decimal) -> Self {
        self.stake = stake;
        self
    }
}

/// Funds issued into an account
#[derive(Debug, Clone, PartialEq)]
pub struct MintRecord {
    pub amount: Decimal,
    /// Caller-supplied reference (e.g. the issuing transaction)
    pub reference: String,
    pub recorded_at: DateTime<Utc>,
}

/// Funds destroyed from an account
#[derive(Debug, Clone, PartialEq)]
pub struct BurnRecord {
    pub amount: Decimal,
    pub reference: String,
    pub recorded_at: DateTime<Utc>,
}

/// A conversion between two currencies performed on behalf of the account
///
/// Recorded for audit only; it does not move the account's balance.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyExchange {
    pub from_currency: String,
    pub to_currency: String,
    pub amount: Decimal,
    pub rate: Decimal,
    pub recorded_at: DateTime<Utc>,
}

/// Kind of connection event observed for an account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionKind {
    Connected,
    Disconnected,
}

/// A peer connecting to or disconnecting from the account's wallet
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionEvent {
    pub peer: String,
    pub kind: ConnectionKind,
    pub recorded_at: DateTime<Utc>,
}

/// Outcome of a contract call made from the account
#[derive(Debug, Clone, PartialEq)]
pub struct ContractExecutionLog {
    pub contract: String,
    pub outcome: String,
    pub recorded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_starts_empty() {
        let account = Account::new("alice");

        assert_eq!(account.id, "alice");
        assert_eq!(account.balance, Decimal::ZERO);
        assert_eq!(account.stake, Decimal::ZERO);
        assert_eq!(account.nonce, 0);
        assert!(!account.verified);
        assert!(account.mint_records.is_empty());
        assert!(account.connection_events.is_empty());
    }

    #[test]
    fn test_builder_sets_opening_amounts() {
        let account = Account::new("bob")
            .with_balance(Decimal::new(2500, 2))
            .with_stake(Decimal::new(100, 0));

        assert_eq!(account.balance, Decimal::new(2500, 2));
        assert_eq!(account.stake, Decimal::new(100, 0));
    }
}
