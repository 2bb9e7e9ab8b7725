//! Multi-signature wallet definitions

use super::account::AccountId;
use chrono::{DateTime, Utc};

/// Wallet identifier
pub type WalletId = String;

/// Wallet authorized by a threshold of owner signatures
///
/// Invariant: `1 <= required_signatures <= owners.len()`. The registry checks
/// it on every create, update and revocation; a value of this type obtained
/// from the ledger always satisfies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiSigWallet {
    pub id: WalletId,

    /// Owners in insertion order, without duplicates
    ///
    /// Order is irrelevant for authorization and only kept for display.
    pub owners: Vec<AccountId>,

    /// Number of distinct owner approvals needed to authorize an operation
    pub required_signatures: usize,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MultiSigWallet {
    /// Whether `account` is currently one of the owners
    pub fn is_owner(&self, account: &str) -> bool {
        self.owners.iter().any(|owner| owner == account)
    }
}
