//! Wallet Ledger CLI
//!
//! Replays a CSV operation script against a fresh ledger and prints the final
//! account states.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- operations.csv > accounts.csv
//! cargo run -- --revocation-policy lower-threshold operations.csv > accounts.csv
//! RUST_LOG=debug cargo run -- --snapshot-retention 32 operations.csv > accounts.csv
//! ```
//!
//! Account states go to stdout. Logs, including every rejected or malformed
//! row, go to stderr and are filtered with `RUST_LOG` (default `warn`).
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, file not readable, etc.)

use std::process;
use tracing_subscriber::EnvFilter;
use wallet_ledger::cli;
use wallet_ledger::replay::Replayer;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();
    let replayer = Replayer::new(args.to_config());

    let mut output = std::io::stdout();
    if let Err(e) = replayer.process(&args.input_file, &mut output) {
        tracing::error!(error = %e, "replay failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
