//! Ledger configuration
//!
//! Policy choices that the ledger must make explicitly rather than leave to
//! chance: how a signer revocation that would break a wallet's threshold is
//! handled, and how many balance snapshots are kept per account.

use crate::types::{LedgerError, LedgerResult};
use clap::ValueEnum;

/// What to do when revoking an owner would leave a wallet with fewer owners
/// than required signatures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RevocationPolicy {
    /// Fail with `InvariantViolation` and leave the wallet unchanged
    #[default]
    Reject,
    /// Remove the owner and lower the threshold to the remaining owner count
    LowerThreshold,
}

/// Configuration for a [`Ledger`](crate::core::Ledger) instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Threshold handling on signer revocation
    pub revocation_policy: RevocationPolicy,

    /// Maximum snapshots kept per account (0 = unlimited)
    ///
    /// When the limit is exceeded the oldest snapshot is discarded, so
    /// point-in-time lookups before the oldest retained snapshot fail with
    /// `SnapshotNotFound`.
    pub snapshot_retention: usize,
}

impl LedgerConfig {
    /// Upper bound accepted for `snapshot_retention`
    pub const MAX_SNAPSHOT_RETENTION: usize = 1_000_000;

    /// Create a configuration with explicit values
    pub fn new(revocation_policy: RevocationPolicy, snapshot_retention: usize) -> Self {
        Self {
            revocation_policy,
            snapshot_retention,
        }
    }

    pub fn with_revocation_policy(mut self, policy: RevocationPolicy) -> Self {
        self.revocation_policy = policy;
        self
    }

    pub fn with_snapshot_retention(mut self, retention: usize) -> Self {
        self.snapshot_retention = retention;
        self
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `snapshot_retention` exceeds
    /// [`Self::MAX_SNAPSHOT_RETENTION`].
    pub fn validate(&self) -> LedgerResult<()> {
        if self.snapshot_retention > Self::MAX_SNAPSHOT_RETENTION {
            return Err(LedgerError::invalid_input(
                "config",
                format!(
                    "snapshot_retention {} exceeds maximum {}",
                    self.snapshot_retention,
                    Self::MAX_SNAPSHOT_RETENTION
                ),
            ));
        }
        Ok(())
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self::new(RevocationPolicy::Reject, 0)
    }
}
