//! CSV format handling for operation scripts and account output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to domain types
//! - Account output serialization
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::{Account, LedgerError, LedgerResult, OperationRecord, OperationType};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns: op, account, target, amount, at.
/// Everything after `account` is optional because most operations only use
/// some of the columns.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    pub op: String,
    pub account: String,
    pub target: Option<String>,
    pub amount: Option<String>,
    pub at: Option<String>,
}

/// Treat missing and whitespace-only cells alike
fn non_empty(cell: Option<String>) -> Option<String> {
    cell.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Convert a CsvRecord to an OperationRecord
///
/// This function:
/// - Parses the operation name (case insensitive) into an OperationType
/// - Parses the amount into a Decimal and the `at` column as RFC 3339
/// - Validates that the amount and target are present where the operation
///   needs them
///
/// # Arguments
///
/// * `csv_record` - The deserialized CSV record
///
/// # Returns
///
/// Result containing either:
/// - Ok(OperationRecord) - Successfully converted record
/// - Err(LedgerError::Parse) - Description of the conversion failure
pub fn convert_csv_record(csv_record: CsvRecord) -> LedgerResult<OperationRecord> {
    let parse_error = |message: String| LedgerError::Parse {
        line: None,
        message,
    };

    let op = match csv_record.op.trim().to_lowercase().as_str() {
        "open" => OperationType::Open,
        "credit" => OperationType::Credit,
        "debit" => OperationType::Debit,
        "transfer" => OperationType::Transfer,
        "adjust" => OperationType::Adjust,
        "stake" => OperationType::Stake,
        "unstake" => OperationType::Unstake,
        "mint" => OperationType::Mint,
        "burn" => OperationType::Burn,
        "snapshot" => OperationType::Snapshot,
        "nonce" => OperationType::Nonce,
        "wallet" => OperationType::Wallet,
        "revoke" => OperationType::Revoke,
        "verify" => OperationType::Verify,
        _ => {
            return Err(parse_error(format!(
                "Invalid operation '{}' for account '{}'",
                csv_record.op, csv_record.account
            )))
        }
    };

    let account = csv_record.account.trim().to_string();
    if account.is_empty() {
        return Err(parse_error(format!("{:?} operation requires an account", op)));
    }

    let amount = match non_empty(csv_record.amount) {
        Some(amount_str) => match Decimal::from_str(&amount_str) {
            Ok(decimal) => Some(decimal),
            Err(_) => {
                return Err(parse_error(format!(
                    "Invalid amount '{}' for account '{}'",
                    amount_str, account
                )))
            }
        },
        None => None,
    };

    let at = match non_empty(csv_record.at) {
        Some(at_str) => match DateTime::parse_from_rfc3339(&at_str) {
            Ok(parsed) => Some(parsed.with_timezone(&Utc)),
            Err(_) => {
                return Err(parse_error(format!(
                    "Invalid timestamp '{}' for account '{}'",
                    at_str, account
                )))
            }
        },
        None => None,
    };

    let target = non_empty(csv_record.target);

    if op.requires_amount() && amount.is_none() {
        return Err(parse_error(format!(
            "{:?} operation for account '{}' requires an amount",
            op, account
        )));
    }
    if op.requires_target() && target.is_none() {
        return Err(parse_error(format!(
            "{:?} operation for account '{}' requires a target",
            op, account
        )));
    }

    Ok(OperationRecord {
        op,
        account,
        target,
        amount,
        at,
    })
}

/// Write account states to CSV format
///
/// Writes accounts in CSV format with columns: account, balance, stake, nonce, verified
/// Accounts are sorted by id for deterministic output.
///
/// # Arguments
///
/// * `accounts` - Slice of account states to write
/// * `output` - Mutable reference to a writer for outputting CSV
///
/// # Errors
///
/// `LedgerError::Io` if a write error occurred
pub fn write_accounts_csv(accounts: &[Account], output: &mut dyn Write) -> LedgerResult<()> {
    use csv::Writer;

    let write_error = |e: csv::Error| LedgerError::Io {
        message: format!("Failed to write account record: {}", e),
    };

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["account", "balance", "stake", "nonce", "verified"])
        .map_err(write_error)?;

    let mut sorted_accounts: Vec<&Account> = accounts.iter().collect();
    sorted_accounts.sort_by(|a, b| a.id.cmp(&b.id));

    for account in sorted_accounts {
        writer
            .write_record(&[
                account.id.clone(),
                format!("{:.4}", account.balance),
                format!("{:.4}", account.stake),
                account.nonce.to_string(),
                account.verified.to_string(),
            ])
            .map_err(write_error)?;
    }

    writer.flush()?;

    Ok(())
}
