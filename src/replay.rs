//! Operation replay
//!
//! Drives a [`Ledger`] from an operation script: reads rows with the
//! [`SyncReader`], applies each one, and writes the final account state with
//! [`write_accounts_csv`]. This is the pipeline the command-line binary runs.
//!
//! # Time
//!
//! The ledger is built with a [`ManualClock`] starting at the Unix epoch. A row
//! with an `at` value moves that clock before the row is applied; rows without
//! one run at the time of the previous row. Replaying the same script
//! therefore always produces the same snapshots and timestamps.
//!
//! # Error Handling
//!
//! Fatal errors (input not readable, output not writable) are returned.
//! Malformed rows and rejected operations are logged with `tracing` and
//! counted, and replay continues with the next row.

use crate::core::{Ledger, LedgerConfig, ManualClock};
use crate::io::csv_format::write_accounts_csv;
use crate::io::sync_reader::SyncReader;
use crate::types::{Account, LedgerError, LedgerResult, OperationRecord, OperationType};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Reference recorded for mint and burn rows that do not name one
const DEFAULT_REFERENCE: &str = "replay";

/// Row counts of a finished replay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Rows the ledger accepted
    pub applied: usize,
    /// Well-formed rows the ledger rejected
    pub rejected: usize,
    /// Rows that could not be parsed
    pub malformed: usize,
}

/// Replays operation scripts against a fresh ledger
#[derive(Debug, Clone, Default)]
pub struct Replayer {
    config: LedgerConfig,
}

impl Replayer {
    pub fn new(config: LedgerConfig) -> Self {
        Replayer { config }
    }

    /// Replay the script at `input_path` and write the final accounts to `output`
    ///
    /// # Errors
    ///
    /// - `Io` if the input cannot be opened or the output cannot be written
    /// - `InvalidInput` if the configuration does not validate
    pub fn process(
        &self,
        input_path: &Path,
        output: &mut dyn Write,
    ) -> LedgerResult<ReplaySummary> {
        let reader = SyncReader::new(input_path)?;
        self.run(reader, output)
    }

    /// Same as [`Replayer::process`] for an already open source
    pub fn process_reader<R: Read>(
        &self,
        input: R,
        output: &mut dyn Write,
    ) -> LedgerResult<ReplaySummary> {
        self.run(SyncReader::from_reader(input), output)
    }

    /// Apply every row of `reader` to a fresh ledger and hand the ledger back
    ///
    /// The ledger runs on a [`ManualClock`] that each row's `at` value moves.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the configuration does not validate. Row failures
    /// are counted in the summary instead.
    pub fn replay<R: Read>(
        &self,
        reader: SyncReader<R>,
    ) -> LedgerResult<(Ledger, ReplaySummary)> {
        let clock = Arc::new(ManualClock::new(DateTime::<Utc>::UNIX_EPOCH));
        let ledger = Ledger::with_clock(self.config.clone(), clock.clone())?;
        let mut summary = ReplaySummary::default();

        for result in reader {
            match result {
                Ok(record) => {
                    if let Some(at) = record.at {
                        clock.set(at);
                    }
                    match apply(&ledger, &record) {
                        Ok(()) => summary.applied += 1,
                        Err(e) => {
                            warn!(
                                op = ?record.op,
                                account = %record.account,
                                error = %e,
                                "operation rejected"
                            );
                            summary.rejected += 1;
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "malformed operation row");
                    summary.malformed += 1;
                }
            }
        }

        info!(
            applied = summary.applied,
            rejected = summary.rejected,
            malformed = summary.malformed,
            "replay finished"
        );

        Ok((ledger, summary))
    }

    fn run<R: Read>(
        &self,
        reader: SyncReader<R>,
        output: &mut dyn Write,
    ) -> LedgerResult<ReplaySummary> {
        let (ledger, summary) = self.replay(reader)?;

        let accounts: Vec<Account> = ledger.accounts();
        write_accounts_csv(&accounts, output)?;

        Ok(summary)
    }
}

fn required<T>(value: Option<T>, record: &OperationRecord, field: &str) -> LedgerResult<T> {
    value.ok_or_else(|| {
        LedgerError::invalid_input(
            &format!("{:?}", record.op).to_lowercase(),
            format!("{} is required", field),
        )
    })
}

/// Wallet thresholds arrive in the amount column and must be whole numbers
fn threshold(amount: Decimal, wallet: &str) -> LedgerResult<usize> {
    if !amount.fract().is_zero() {
        return Err(LedgerError::invalid_input(
            "wallet",
            format!("threshold {} for '{}' is not a whole number", amount, wallet),
        ));
    }
    amount.to_usize().ok_or_else(|| {
        LedgerError::invalid_input(
            "wallet",
            format!("threshold {} for '{}' is out of range", amount, wallet),
        )
    })
}

/// Apply one operation record to the ledger
///
/// # Errors
///
/// Whatever the underlying ledger call returns, or `InvalidInput` when the
/// record lacks a column the operation needs.
pub fn apply(ledger: &Ledger, record: &OperationRecord) -> LedgerResult<()> {
    let id = record.account.as_str();
    let amount = || required(record.amount, record, "amount");
    let target = || required(record.target.as_deref(), record, "target");

    match record.op {
        OperationType::Open => {
            let opening = record.amount.unwrap_or(Decimal::ZERO);
            ledger.create_account(Account::new(id).with_balance(opening))
        }
        OperationType::Credit => ledger.credit(id, amount()?).map(drop),
        OperationType::Debit => ledger.debit(id, amount()?).map(drop),
        OperationType::Transfer => ledger.transfer(id, target()?, amount()?),
        OperationType::Adjust => ledger.adjust_balance(id, amount()?).map(drop),
        OperationType::Stake => ledger.stake(id, amount()?),
        OperationType::Unstake => ledger.unstake(id, amount()?),
        OperationType::Mint => {
            let reference = record.target.as_deref().unwrap_or(DEFAULT_REFERENCE);
            ledger.mint(id, amount()?, reference).map(drop)
        }
        OperationType::Burn => {
            let reference = record.target.as_deref().unwrap_or(DEFAULT_REFERENCE);
            ledger.burn(id, amount()?, reference).map(drop)
        }
        OperationType::Snapshot => ledger.save_snapshot(id).map(drop),
        OperationType::Nonce => ledger.next_nonce(id).map(drop),
        OperationType::Wallet => {
            let owners = target()?.split(';').map(str::trim);
            ledger.create_wallet(id, owners, threshold(amount()?, id)?)
        }
        OperationType::Revoke => ledger.revoke_signature(id, target()?).map(drop),
        OperationType::Verify => ledger.update_verification_status(id, true),
    }
}
