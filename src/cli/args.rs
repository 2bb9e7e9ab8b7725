use crate::core::{LedgerConfig, RevocationPolicy};
use clap::Parser;
use std::path::PathBuf;

/// Replay wallet ledger operations and print the resulting accounts
#[derive(Parser, Debug)]
#[command(name = "wallet-ledger")]
#[command(about = "Replay wallet ledger operations from a CSV script", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing operation records
    #[arg(value_name = "INPUT", help = "Path to the input CSV file")]
    pub input_file: PathBuf,

    /// Handling of revocations that would break a wallet threshold
    #[arg(
        long = "revocation-policy",
        value_name = "POLICY",
        default_value = "reject",
        help = "Revocation policy: 'reject' or 'lower-threshold'"
    )]
    pub revocation_policy: RevocationPolicy,

    /// Snapshots kept per account
    #[arg(
        long = "snapshot-retention",
        value_name = "COUNT",
        default_value_t = 0,
        help = "Snapshots kept per account (default: 0, unlimited)"
    )]
    pub snapshot_retention: usize,
}

impl CliArgs {
    /// Build the ledger configuration from CLI arguments
    ///
    /// The result is not validated here; the ledger validates it on
    /// construction.
    pub fn to_config(&self) -> LedgerConfig {
        LedgerConfig::new(self.revocation_policy, self.snapshot_retention)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::default_policy(&["program", "input.csv"], RevocationPolicy::Reject)]
    #[case::explicit_reject(&["program", "--revocation-policy", "reject", "input.csv"], RevocationPolicy::Reject)]
    #[case::lower_threshold(
        &["program", "--revocation-policy", "lower-threshold", "input.csv"],
        RevocationPolicy::LowerThreshold
    )]
    fn test_policy_parsing(#[case] args: &[&str], #[case] expected: RevocationPolicy) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.revocation_policy, expected);
    }

    #[rstest]
    #[case::default_retention(&["program", "input.csv"], 0)]
    #[case::custom_retention(&["program", "--snapshot-retention", "16", "input.csv"], 16)]
    fn test_config_conversion(#[case] args: &[&str], #[case] expected_retention: usize) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        let config = parsed.to_config();

        assert_eq!(config.snapshot_retention, expected_retention);
        assert_eq!(config.revocation_policy, parsed.revocation_policy);
        assert_eq!(parsed.input_file, PathBuf::from("input.csv"));
    }

    #[rstest]
    #[case::missing_input(&["program"])]
    #[case::invalid_policy(&["program", "--revocation-policy", "ignore", "input.csv"])]
    #[case::negative_retention(&["program", "--snapshot-retention", "-1", "input.csv"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        let result = CliArgs::try_parse_from(args);
        assert!(result.is_err());
    }
}
