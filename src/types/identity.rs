//! Identity and recovery metadata attached to an account

use super::account::AccountId;
use chrono::{DateTime, Utc};

/// Recovery configuration registered for a wallet
///
/// The descriptor is opaque to the ledger (a guardian list, a hint, a
/// reference to an off-ledger recovery scheme).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoverySetup {
    pub descriptor: String,
    pub configured_at: DateTime<Utc>,
}

/// Auxiliary per-account identity metadata
///
/// Created on the first identity write for an account and overwritten field
/// by field afterwards; previous values are not kept. Keys are stored as
/// references or encrypted blobs, never as raw secrets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRecord {
    pub account: AccountId,
    pub public_key: Option<String>,
    /// Reference to where the private key is held (vault path, HSM slot)
    pub private_key_ref: Option<String>,
    /// Encrypted key material, exclusively owned by this record
    pub encrypted_key: Option<Vec<u8>>,
    pub recovery: Option<RecoverySetup>,
    /// Optional display name
    pub custom_name: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl IdentityRecord {
    /// Empty identity for `account`
    pub fn new(account: impl Into<AccountId>, now: DateTime<Utc>) -> Self {
        IdentityRecord {
            account: account.into(),
            public_key: None,
            private_key_ref: None,
            encrypted_key: None,
            recovery: None,
            custom_name: None,
            updated_at: now,
        }
    }
}
