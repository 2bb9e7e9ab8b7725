//! Error types for the wallet ledger
//!
//! Every fallible ledger operation returns a [`LedgerError`]. Each variant
//! carries the identifiers and amounts involved so that callers (and the
//! replay CLI) can report a precise reason. Variants are grouped into a small
//! set of [`ErrorKind`]s that callers can branch on without matching every
//! variant.
//!
//! # Error Categories
//!
//! - **Input errors**: empty identifiers, non-positive amounts, bad thresholds
//! - **Lookup errors**: missing accounts, wallets, snapshots or identities
//! - **Conflict errors**: duplicate creation
//! - **Balance errors**: debits and transfers exceeding the balance
//! - **Invariant errors**: edits that would break a multi-sig wallet or nonce
//! - **Replay errors**: I/O and parse failures of the replay CLI

use rust_decimal::Decimal;
use thiserror::Error;

/// Coarse classification of a [`LedgerError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    AlreadyExists,
    InsufficientFunds,
    InvariantViolation,
    Io,
}

/// Main error type for the wallet ledger
///
/// A failed operation never commits a partial mutation: when one of these is
/// returned the ledger is exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Caller supplied an unusable argument
    #[error("Invalid input for {operation}: {reason}")]
    InvalidInput {
        /// Operation that rejected the input
        operation: String,
        /// What was wrong with it
        reason: String,
    },

    /// Account identifier is not present in the store
    #[error("Account '{account}' not found")]
    AccountNotFound {
        /// The missing account identifier
        account: String,
    },

    /// Multi-signature wallet identifier is not registered
    #[error("Wallet '{wallet}' not found")]
    WalletNotFound {
        /// The missing wallet identifier
        wallet: String,
    },

    /// No snapshot of the account was taken at or before the requested time
    #[error("No balance snapshot for account '{account}' at or before {at}")]
    SnapshotNotFound {
        /// Account that was queried
        account: String,
        /// Requested point in time (RFC 3339)
        at: String,
    },

    /// No identity metadata has been written for the account yet
    #[error("No identity recorded for account '{account}'")]
    IdentityNotFound {
        /// Account that was queried
        account: String,
    },

    /// Key is not present in a generic record store
    #[error("{entity} '{key}' not found")]
    RecordNotFound {
        /// Kind of record the store holds
        entity: String,
        /// The missing key
        key: String,
    },

    /// Creation of an entity whose identifier is already taken
    #[error("{entity} '{id}' already exists")]
    AlreadyExists {
        /// Kind of entity ("Account", "Wallet", "Record")
        entity: String,
        /// The duplicated identifier
        id: String,
    },

    /// Debit side of an operation lacks the requested funds
    #[error(
        "Insufficient funds in account '{account}': available {available}, requested {requested}"
    )]
    InsufficientFunds {
        /// Account being debited
        account: String,
        /// Balance at the time of the request
        available: Decimal,
        /// Amount that was requested
        requested: Decimal,
    },

    /// Edit would leave a record in a state that breaks one of its invariants
    #[error("Invariant violated for '{id}': {reason}")]
    InvariantViolation {
        /// Wallet or account identifier
        id: String,
        /// Description of the broken invariant
        reason: String,
    },

    /// Decimal arithmetic would exceed the representable range
    #[error("Arithmetic overflow in {operation} for account '{account}'")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account involved
        account: String,
    },

    /// I/O error in the replay layer
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// Malformed operation row in the replay layer
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Parse {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },
}

/// Result alias used throughout the crate
pub type LedgerResult<T> = Result<T, LedgerError>;

impl LedgerError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::InvalidInput { .. }
            | LedgerError::ArithmeticOverflow { .. }
            | LedgerError::Parse { .. } => ErrorKind::InvalidInput,
            LedgerError::AccountNotFound { .. }
            | LedgerError::WalletNotFound { .. }
            | LedgerError::SnapshotNotFound { .. }
            | LedgerError::IdentityNotFound { .. }
            | LedgerError::RecordNotFound { .. } => ErrorKind::NotFound,
            LedgerError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            LedgerError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            LedgerError::InvariantViolation { .. } => ErrorKind::InvariantViolation,
            LedgerError::Io { .. } => ErrorKind::Io,
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(operation: &str, reason: impl Into<String>) -> Self {
        LedgerError::InvalidInput {
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(account: &str) -> Self {
        LedgerError::AccountNotFound {
            account: account.to_string(),
        }
    }

    /// Create a WalletNotFound error
    pub fn wallet_not_found(wallet: &str) -> Self {
        LedgerError::WalletNotFound {
            wallet: wallet.to_string(),
        }
    }

    /// Create a SnapshotNotFound error
    pub fn snapshot_not_found(account: &str, at: chrono::DateTime<chrono::Utc>) -> Self {
        LedgerError::SnapshotNotFound {
            account: account.to_string(),
            at: at.to_rfc3339(),
        }
    }

    /// Create an IdentityNotFound error
    pub fn identity_not_found(account: &str) -> Self {
        LedgerError::IdentityNotFound {
            account: account.to_string(),
        }
    }

    /// Create a RecordNotFound error
    pub fn record_not_found(entity: &str, key: &str) -> Self {
        LedgerError::RecordNotFound {
            entity: entity.to_string(),
            key: key.to_string(),
        }
    }

    /// Create an AlreadyExists error
    pub fn already_exists(entity: &str, id: &str) -> Self {
        LedgerError::AlreadyExists {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(account: &str, available: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientFunds {
            account: account.to_string(),
            available,
            requested,
        }
    }

    /// Create an InvariantViolation error
    pub fn invariant_violation(id: &str, reason: impl Into<String>) -> Self {
        LedgerError::InvariantViolation {
            id: id.to_string(),
            reason: reason.into(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, account: &str) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            account: account.to_string(),
        }
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::Parse {
            line,
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::invalid_input(
        LedgerError::invalid_input("credit", "amount must be positive"),
        "Invalid input for credit: amount must be positive"
    )]
    #[case::account_not_found(
        LedgerError::account_not_found("alice"),
        "Account 'alice' not found"
    )]
    #[case::wallet_not_found(LedgerError::wallet_not_found("w1"), "Wallet 'w1' not found")]
    #[case::already_exists(
        LedgerError::already_exists("Account", "alice"),
        "Account 'alice' already exists"
    )]
    #[case::insufficient_funds(
        LedgerError::insufficient_funds("alice", Decimal::new(60, 0), Decimal::new(1000, 0)),
        "Insufficient funds in account 'alice': available 60, requested 1000"
    )]
    #[case::invariant(
        LedgerError::invariant_violation("w1", "2 signatures required but 1 owner remains"),
        "Invariant violated for 'w1': 2 signatures required but 1 owner remains"
    )]
    #[case::parse_with_line(
        LedgerError::Parse { line: Some(7), message: "unknown op".to_string() },
        "CSV parse error at line 7: unknown op"
    )]
    #[case::parse_without_line(
        LedgerError::Parse { line: None, message: "unknown op".to_string() },
        "CSV parse error: unknown op"
    )]
    fn test_error_display(#[case] error: LedgerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case(LedgerError::invalid_input("debit", "x"), ErrorKind::InvalidInput)]
    #[case(LedgerError::arithmetic_overflow("credit", "a"), ErrorKind::InvalidInput)]
    #[case(LedgerError::account_not_found("a"), ErrorKind::NotFound)]
    #[case(LedgerError::wallet_not_found("w"), ErrorKind::NotFound)]
    #[case(LedgerError::identity_not_found("a"), ErrorKind::NotFound)]
    #[case(LedgerError::already_exists("Wallet", "w"), ErrorKind::AlreadyExists)]
    #[case(
        LedgerError::insufficient_funds("a", Decimal::ZERO, Decimal::ONE),
        ErrorKind::InsufficientFunds
    )]
    #[case(LedgerError::invariant_violation("w", "x"), ErrorKind::InvariantViolation)]
    fn test_error_kind(#[case] error: LedgerError, #[case] expected: ErrorKind) {
        assert_eq!(error.kind(), expected);
    }

    #[test]
    fn test_snapshot_not_found_formats_timestamp() {
        let at = chrono::DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc);
        let error = LedgerError::snapshot_not_found("alice", at);

        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert!(error.to_string().contains("2024-01-01T00:00:00+00:00"));
    }

    #[test]
    fn test_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.csv");
        let error: LedgerError = io_error.into();

        assert_eq!(error.kind(), ErrorKind::Io);
        assert!(error.to_string().contains("missing.csv"));
    }
}
