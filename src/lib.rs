//! Wallet Ledger Library
//! # Overview
//!
//! This library provides the in-process core of a wallet and account ledger:
//! balances with historical snapshots, per-account nonces, multi-signature
//! wallets and identity metadata, all behind one thread-safe facade.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Records handed out by the ledger (Account, MultiSigWallet, etc.)
//! - [`core`] - Business logic components:
//!   - [`core::ledger`] - The `Ledger` facade and its locking discipline
//!   - [`core::account_store`] - Account records
//!   - [`core::balance_ledger`] - Balance movement and snapshots
//!   - [`core::nonce`] - Nonce allocation
//!   - [`core::multisig`] - Multi-signature wallet registry
//!   - [`core::identity_store`] - Identity metadata
//!   - [`core::record_store`] - Generic keyed store for peripheral ledgers
//! - [`io`] - CSV reading and writing for the replay CLI
//! - [`replay`] - Applies an operation script to a fresh ledger
//! - [`cli`] - CLI arguments parsing
//!
//! # Guarantees
//!
//! - Balances and stakes never go negative
//! - Transfers conserve the total balance and are all-or-nothing
//! - `next_nonce` never returns the same value twice for an account
//! - A multi-sig wallet always has at least one owner and a threshold in
//!   `[1, owners]`
//! - A failed operation leaves the ledger unchanged
//!
//! # Example
//!
//! ```
//! use rust_decimal::Decimal;
//! use wallet_ledger::{Ledger, LedgerConfig};
//!
//! let ledger = Ledger::new(LedgerConfig::default()).unwrap();
//! ledger.open_account("A").unwrap();
//! ledger.open_account("B").unwrap();
//! ledger.credit("A", Decimal::new(100, 0)).unwrap();
//! ledger.transfer("A", "B", Decimal::new(40, 0)).unwrap();
//!
//! assert_eq!(ledger.balance("A").unwrap(), Decimal::new(60, 0));
//! assert_eq!(ledger.balance("B").unwrap(), Decimal::new(40, 0));
//! ```

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod replay;
pub mod types;

pub use core::{
    Clock, Ledger, LedgerConfig, ManualClock, RecordStore, RevocationPolicy, SystemClock,
};
pub use io::write_accounts_csv;
pub use replay::{Replayer, ReplaySummary};
pub use types::{
    Account, AccountId, BalanceSnapshot, ErrorKind, IdentityRecord, LedgerError, LedgerResult,
    MultiSigWallet, OperationRecord, OperationType, WalletId,
};
