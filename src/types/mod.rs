//! Types module
//!
//! Contains the records the ledger owns and hands out as copies.
//! This module organizes types into logical submodules:
//! - `account`: Account record and its append-only sub-event records
//! - `snapshot`: Point-in-time balance records
//! - `wallet`: Multi-signature wallet definitions
//! - `identity`: Identity and recovery metadata
//! - `operation`: Operation records consumed by the replay layer
//! - `error`: Error types for the ledger

pub mod account;
pub mod error;
pub mod identity;
pub mod operation;
pub mod snapshot;
pub mod wallet;

pub use account::{
    Account, AccountId, BurnRecord, ConnectionEvent, ConnectionKind, ContractExecutionLog,
    CurrencyExchange, MintRecord,
};
pub use error::{ErrorKind, LedgerError, LedgerResult};
pub use identity::{IdentityRecord, RecoverySetup};
pub use operation::{OperationRecord, OperationType};
pub use snapshot::BalanceSnapshot;
pub use wallet::{MultiSigWallet, WalletId};
