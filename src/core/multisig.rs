//! Multi-signature wallet registry
//!
//! This module provides the `MultiSigWalletRegistry`, which owns wallet
//! definitions (owner set plus signature threshold) independently of the
//! single-owner accounts in [`AccountStore`](crate::core::AccountStore).
//!
//! Every successful create, update or revocation leaves the wallet with
//! `1 <= required_signatures <= owners.len()`. How a revocation that would
//! break this is handled is decided by [`RevocationPolicy`].
//!
//! The registry only tracks *who* must sign and *how many*; it never verifies
//! signatures.

use crate::core::account_store::validate_id;
use crate::core::config::RevocationPolicy;
use crate::types::{AccountId, LedgerError, LedgerResult, MultiSigWallet, WalletId};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

/// Owns all multi-signature wallet definitions
#[derive(Debug, Default)]
pub struct MultiSigWalletRegistry {
    wallets: HashMap<WalletId, MultiSigWallet>,
    policy: RevocationPolicy,
}

impl MultiSigWalletRegistry {
    pub fn new(policy: RevocationPolicy) -> Self {
        MultiSigWalletRegistry {
            wallets: HashMap::new(),
            policy,
        }
    }

    /// Register a new wallet
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the id is blank, the owner list is empty, contains
    ///   blank or duplicate ids, or `required` is outside `[1, owners.len()]`
    /// - `AlreadyExists` if the wallet id is taken
    pub fn create(
        &mut self,
        id: &str,
        owners: Vec<AccountId>,
        required: usize,
        now: DateTime<Utc>,
    ) -> LedgerResult<()> {
        validate_id("create_wallet", id)?;
        validate_owners("create_wallet", &owners, required)?;

        if self.wallets.contains_key(id) {
            return Err(LedgerError::already_exists("Wallet", id));
        }

        self.wallets.insert(
            id.to_string(),
            MultiSigWallet {
                id: id.to_string(),
                owners,
                required_signatures: required,
                created_at: now,
                updated_at: now,
            },
        );

        Ok(())
    }

    pub fn get(&self, id: &str) -> LedgerResult<&MultiSigWallet> {
        self.wallets
            .get(id)
            .ok_or_else(|| LedgerError::wallet_not_found(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.wallets.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    /// Replace a wallet's owners and threshold
    ///
    /// # Errors
    ///
    /// - `InvalidInput` under the same rules as [`Self::create`]
    /// - `NotFound` if the wallet does not exist
    pub fn update(
        &mut self,
        id: &str,
        owners: Vec<AccountId>,
        required: usize,
        now: DateTime<Utc>,
    ) -> LedgerResult<()> {
        validate_id("update_wallet", id)?;
        validate_owners("update_wallet", &owners, required)?;

        let wallet = self
            .wallets
            .get_mut(id)
            .ok_or_else(|| LedgerError::wallet_not_found(id))?;

        wallet.owners = owners;
        wallet.required_signatures = required;
        wallet.updated_at = now;

        Ok(())
    }

    /// Remove `owner` from the wallet's signer set
    ///
    /// If the remaining owners are fewer than the threshold, the configured
    /// policy either rejects the revocation or lowers the threshold. Removing
    /// the last owner is always rejected since no threshold could be valid.
    ///
    /// # Returns
    ///
    /// The wallet as it is after the revocation.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the wallet does not exist
    /// - `InvalidInput` if `owner` is not currently an owner
    /// - `InvariantViolation` if the revocation would break the threshold and
    ///   cannot be repaired under the policy
    pub fn revoke(
        &mut self,
        id: &str,
        owner: &str,
        now: DateTime<Utc>,
    ) -> LedgerResult<MultiSigWallet> {
        let wallet = self
            .wallets
            .get_mut(id)
            .ok_or_else(|| LedgerError::wallet_not_found(id))?;

        let position = wallet
            .owners
            .iter()
            .position(|existing| existing == owner)
            .ok_or_else(|| {
                LedgerError::invalid_input(
                    "revoke_signature",
                    format!("'{}' is not an owner of wallet '{}'", owner, id),
                )
            })?;

        let remaining = wallet.owners.len() - 1;
        if remaining == 0 {
            return Err(LedgerError::invariant_violation(
                id,
                format!("revoking '{}' would leave the wallet without owners", owner),
            ));
        }

        let required = if wallet.required_signatures > remaining {
            match self.policy {
                RevocationPolicy::Reject => {
                    return Err(LedgerError::invariant_violation(
                        id,
                        format!(
                            "{} signatures required but only {} owners would remain",
                            wallet.required_signatures, remaining
                        ),
                    ));
                }
                RevocationPolicy::LowerThreshold => remaining,
            }
        } else {
            wallet.required_signatures
        };

        wallet.owners.remove(position);
        wallet.required_signatures = required;
        wallet.updated_at = now;

        Ok(wallet.clone())
    }

    /// Whether the distinct owners among `signers` meet the threshold
    ///
    /// Signers that are not owners and repeated signers are ignored.
    pub fn approvals_satisfied(&self, id: &str, signers: &[AccountId]) -> LedgerResult<bool> {
        let wallet = self.get(id)?;

        let approvals: HashSet<&str> = signers
            .iter()
            .map(String::as_str)
            .filter(|signer| wallet.is_owner(signer))
            .collect();

        Ok(approvals.len() >= wallet.required_signatures)
    }
}

fn validate_owners(operation: &str, owners: &[AccountId], required: usize) -> LedgerResult<()> {
    if owners.is_empty() {
        return Err(LedgerError::invalid_input(
            operation,
            "a wallet needs at least one owner",
        ));
    }

    let mut seen = HashSet::with_capacity(owners.len());
    for owner in owners {
        validate_id(operation, owner)?;
        if !seen.insert(owner.as_str()) {
            return Err(LedgerError::invalid_input(
                operation,
                format!("owner '{}' listed more than once", owner),
            ));
        }
    }

    if required == 0 || required > owners.len() {
        return Err(LedgerError::invalid_input(
            operation,
            format!(
                "required signatures {} must be between 1 and {}",
                required,
                owners.len()
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorKind;
    use rstest::rstest;

    fn owners(ids: &[&str]) -> Vec<AccountId> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    fn registry_with_w1(policy: RevocationPolicy) -> MultiSigWalletRegistry {
        let mut registry = MultiSigWalletRegistry::new(policy);
        registry
            .create("w1", owners(&["u1", "u2", "u3"]), 2, Utc::now())
            .unwrap();
        registry
    }

    fn assert_threshold_invariant(wallet: &MultiSigWallet) {
        assert!(wallet.required_signatures >= 1);
        assert!(wallet.required_signatures <= wallet.owners.len());
    }

    #[test]
    fn test_create_and_get() {
        let registry = registry_with_w1(RevocationPolicy::Reject);

        let wallet = registry.get("w1").unwrap();
        assert_eq!(wallet.owners, owners(&["u1", "u2", "u3"]));
        assert_eq!(wallet.required_signatures, 2);
        assert_threshold_invariant(wallet);
    }

    #[rstest]
    #[case::empty_id("", owners(&["u1"]), 1)]
    #[case::no_owners("w2", owners(&[]), 1)]
    #[case::zero_threshold("w2", owners(&["u1", "u2"]), 0)]
    #[case::threshold_above_owners("w2", owners(&["u1", "u2"]), 3)]
    #[case::duplicate_owner("w2", owners(&["u1", "u1"]), 1)]
    #[case::blank_owner("w2", owners(&["u1", " "]), 1)]
    fn test_create_rejects_invalid_definitions(
        #[case] id: &str,
        #[case] owner_list: Vec<AccountId>,
        #[case] required: usize,
    ) {
        let mut registry = MultiSigWalletRegistry::new(RevocationPolicy::Reject);

        let result = registry.create(id, owner_list, required, Utc::now());

        assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidInput);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_create_duplicate_wallet() {
        let mut registry = registry_with_w1(RevocationPolicy::Reject);

        let result = registry.create("w1", owners(&["x"]), 1, Utc::now());

        assert_eq!(result.unwrap_err().kind(), ErrorKind::AlreadyExists);
        assert_eq!(registry.get("w1").unwrap().owners.len(), 3);
    }

    #[test]
    fn test_get_missing_wallet() {
        let registry = MultiSigWalletRegistry::new(RevocationPolicy::Reject);
        assert_eq!(registry.get("nope").unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_update_replaces_owners_and_threshold() {
        let mut registry = registry_with_w1(RevocationPolicy::Reject);

        registry
            .update("w1", owners(&["u4", "u5"]), 1, Utc::now())
            .unwrap();

        let wallet = registry.get("w1").unwrap();
        assert_eq!(wallet.owners, owners(&["u4", "u5"]));
        assert_eq!(wallet.required_signatures, 1);
    }

    #[test]
    fn test_update_validates_before_lookup_and_keeps_wallet() {
        let mut registry = registry_with_w1(RevocationPolicy::Reject);

        let invalid = registry.update("w1", owners(&["u1"]), 2, Utc::now());
        assert_eq!(invalid.unwrap_err().kind(), ErrorKind::InvalidInput);
        assert_eq!(registry.get("w1").unwrap().required_signatures, 2);

        let missing = registry.update("w9", owners(&["u1"]), 1, Utc::now());
        assert_eq!(missing.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[rstest]
    #[case(RevocationPolicy::Reject)]
    #[case(RevocationPolicy::LowerThreshold)]
    fn test_revoke_keeping_threshold_valid(#[case] policy: RevocationPolicy) {
        let mut registry = registry_with_w1(policy);

        let wallet = registry.revoke("w1", "u1", Utc::now()).unwrap();

        assert_eq!(wallet.owners, owners(&["u2", "u3"]));
        assert_eq!(wallet.required_signatures, 2);
        assert_threshold_invariant(&wallet);
    }

    #[test]
    fn test_revoke_breaking_threshold_is_rejected_under_reject_policy() {
        let mut registry = registry_with_w1(RevocationPolicy::Reject);
        registry.revoke("w1", "u1", Utc::now()).unwrap();

        let result = registry.revoke("w1", "u2", Utc::now());

        assert_eq!(result.unwrap_err().kind(), ErrorKind::InvariantViolation);
        let wallet = registry.get("w1").unwrap();
        assert_eq!(wallet.owners, owners(&["u2", "u3"]));
        assert_eq!(wallet.required_signatures, 2);
    }

    #[test]
    fn test_revoke_breaking_threshold_lowers_it_under_lower_policy() {
        let mut registry = registry_with_w1(RevocationPolicy::LowerThreshold);
        registry.revoke("w1", "u1", Utc::now()).unwrap();

        let wallet = registry.revoke("w1", "u2", Utc::now()).unwrap();

        assert_eq!(wallet.owners, owners(&["u3"]));
        assert_eq!(wallet.required_signatures, 1);
        assert_threshold_invariant(&wallet);
    }

    #[rstest]
    #[case(RevocationPolicy::Reject)]
    #[case(RevocationPolicy::LowerThreshold)]
    fn test_revoke_last_owner_always_rejected(#[case] policy: RevocationPolicy) {
        let mut registry = MultiSigWalletRegistry::new(policy);
        registry.create("solo", owners(&["u1"]), 1, Utc::now()).unwrap();

        let result = registry.revoke("solo", "u1", Utc::now());

        assert_eq!(result.unwrap_err().kind(), ErrorKind::InvariantViolation);
        assert_eq!(registry.get("solo").unwrap().owners, owners(&["u1"]));
    }

    #[test]
    fn test_revoke_non_owner_and_missing_wallet() {
        let mut registry = registry_with_w1(RevocationPolicy::Reject);

        let non_owner = registry.revoke("w1", "mallory", Utc::now());
        assert_eq!(non_owner.unwrap_err().kind(), ErrorKind::InvalidInput);

        let missing = registry.revoke("w9", "u1", Utc::now());
        assert_eq!(missing.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[rstest]
    #[case::meets_threshold(owners(&["u1", "u2"]), true)]
    #[case::exceeds_threshold(owners(&["u1", "u2", "u3"]), true)]
    #[case::below_threshold(owners(&["u3"]), false)]
    #[case::repeated_signer(owners(&["u1", "u1"]), false)]
    #[case::outsider_ignored(owners(&["u1", "mallory"]), false)]
    #[case::none(owners(&[]), false)]
    fn test_approvals_satisfied(#[case] signers: Vec<AccountId>, #[case] expected: bool) {
        let registry = registry_with_w1(RevocationPolicy::Reject);

        assert_eq!(registry.approvals_satisfied("w1", &signers).unwrap(), expected);
    }
}
