//! Core ledger components
//!
//! - `traits` - Clock abstraction for deterministic timestamps
//! - `config` - Ledger construction options
//! - `account_store` - Account records and their existence checks
//! - `balance_ledger` - Balance movement and historical snapshots
//! - `nonce` - Per-account monotonic nonce allocation
//! - `multisig` - Multi-signature wallet registry
//! - `identity_store` - Identity metadata and verification state
//! - `record_store` - Generic keyed store for peripheral ledgers
//! - `ledger` - The locked facade composing all of the above

pub mod account_store;
pub mod balance_ledger;
pub mod config;
pub mod identity_store;
pub mod ledger;
pub mod multisig;
pub mod nonce;
pub mod record_store;
pub mod traits;

pub use account_store::AccountStore;
pub use balance_ledger::BalanceLedger;
pub use config::{LedgerConfig, RevocationPolicy};
pub use identity_store::IdentityStore;
pub use ledger::Ledger;
pub use multisig::MultiSigWalletRegistry;
pub use nonce::NonceAllocator;
pub use record_store::{RecordStore, TimestampedEvent};
pub use traits::{Clock, ManualClock, SystemClock};
