//! Point-in-time balance records

use super::account::AccountId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Immutable record of an account's balance at a moment in time
///
/// Snapshots are only taken on explicit request. Per account they form a
/// sequence ordered by `taken_at`, which is what point-in-time lookups rely on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceSnapshot {
    pub account: AccountId,
    pub balance: Decimal,
    pub taken_at: DateTime<Utc>,
}
