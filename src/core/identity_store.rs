//! Identity store module
//!
//! Owns the per-account identity metadata (keys, recovery setup, display
//! name) and records the identity-related account state (verification flag,
//! connection events). Every write requires the owning account to exist in
//! the [`AccountStore`]; there are no other cross-record invariants.
//!
//! Identity records are created on first write and overwritten afterwards.

use crate::core::account_store::AccountStore;
use crate::types::{
    AccountId, ConnectionEvent, ConnectionKind, IdentityRecord, LedgerError, LedgerResult,
    RecoverySetup,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Reject a blank value, naming the field in the error
fn require_value(operation: &str, field: &str, value: &str) -> LedgerResult<()> {
    if value.trim().is_empty() {
        return Err(LedgerError::invalid_input(
            operation,
            format!("{} cannot be empty", field),
        ));
    }
    Ok(())
}

#[derive(Debug, Default)]
pub struct IdentityStore {
    identities: HashMap<AccountId, IdentityRecord>,
}

impl IdentityStore {
    pub fn new() -> Self {
        IdentityStore {
            identities: HashMap::new(),
        }
    }

    /// Identity record of `id`
    ///
    /// # Errors
    ///
    /// `NotFound` if nothing has been written for the account.
    pub fn get(&self, id: &str) -> LedgerResult<&IdentityRecord> {
        self.identities
            .get(id)
            .ok_or_else(|| LedgerError::identity_not_found(id))
    }

    /// Store the account's public key and a reference to its private key
    pub fn store_identity(
        &mut self,
        accounts: &AccountStore,
        id: &str,
        public_key: &str,
        private_key_ref: &str,
        now: DateTime<Utc>,
    ) -> LedgerResult<()> {
        require_value("store_identity", "public key", public_key)?;
        let record = self.record_for(accounts, id, now)?;
        record.public_key = Some(public_key.to_string());
        record.private_key_ref = Some(private_key_ref.to_string());
        Ok(())
    }

    /// Register (or replace) the account's recovery configuration
    pub fn log_recovery_setup(
        &mut self,
        accounts: &AccountStore,
        id: &str,
        descriptor: &str,
        now: DateTime<Utc>,
    ) -> LedgerResult<()> {
        require_value("log_recovery_setup", "recovery descriptor", descriptor)?;
        let record = self.record_for(accounts, id, now)?;
        record.recovery = Some(RecoverySetup {
            descriptor: descriptor.to_string(),
            configured_at: now,
        });
        Ok(())
    }

    /// Store encrypted key material; the blob is moved into the record
    pub fn store_wallet_key(
        &mut self,
        accounts: &AccountStore,
        id: &str,
        encrypted_key: Vec<u8>,
        now: DateTime<Utc>,
    ) -> LedgerResult<()> {
        if encrypted_key.is_empty() {
            return Err(LedgerError::invalid_input(
                "store_wallet_key",
                "encrypted key cannot be empty",
            ));
        }
        let record = self.record_for(accounts, id, now)?;
        record.encrypted_key = Some(encrypted_key);
        Ok(())
    }

    /// Set or clear the account's display name
    pub fn set_custom_name(
        &mut self,
        accounts: &AccountStore,
        id: &str,
        name: Option<&str>,
        now: DateTime<Utc>,
    ) -> LedgerResult<()> {
        let record = self.record_for(accounts, id, now)?;
        record.custom_name = name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        Ok(())
    }

    /// Set the account's verification flag
    pub fn update_verification_status(
        &self,
        accounts: &mut AccountStore,
        id: &str,
        verified: bool,
        now: DateTime<Utc>,
    ) -> LedgerResult<()> {
        let account = accounts.get_mut(id)?;
        account.verified = verified;
        account.updated_at = now;
        Ok(())
    }

    /// Append a connection event to the account
    pub fn record_connection_event(
        &self,
        accounts: &mut AccountStore,
        id: &str,
        peer: &str,
        kind: ConnectionKind,
        now: DateTime<Utc>,
    ) -> LedgerResult<()> {
        require_value("record_connection_event", "peer", peer)?;
        let account = accounts.get_mut(id)?;
        account.connection_events.push(ConnectionEvent {
            peer: peer.to_string(),
            kind,
            recorded_at: now,
        });
        account.updated_at = now;
        Ok(())
    }

    /// Existing record of `id`, or a fresh one if the account exists
    fn record_for(
        &mut self,
        accounts: &AccountStore,
        id: &str,
        now: DateTime<Utc>,
    ) -> LedgerResult<&mut IdentityRecord> {
        accounts.get(id)?;
        let record = self
            .identities
            .entry(id.to_string())
            .or_insert_with(|| IdentityRecord::new(id, now));
        record.updated_at = now;
        Ok(record)
    }
}
