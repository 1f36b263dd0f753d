//! # evensplit-cli
//!
//! Reads a `CalculationInput` JSON document, runs the settlement pipeline
//! and writes the `CalculationResults` JSON to stdout.
//!
//! ```text
//! evensplit trip.json --config settle.json --pretty --digest
//! ```

pub mod logging;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use evensplit_settlement::{compute_results, results_digest_hex};
use evensplit_types::constants::{ENGINE_NAME, VERSION};
use evensplit_types::{CalculationInput, CalculationResults, SettlementConfig};

#[derive(Debug, Parser)]
#[command(name = ENGINE_NAME, version = VERSION, about = "Split shared expenses and settle who owes whom")]
pub struct Args {
    /// Input document with `participants` and `expenses`.
    pub input: PathBuf,

    /// Settlement config as JSON. Defaults apply when omitted.
    #[arg(short, long, value_name = "CONFIG.json")]
    pub config: Option<PathBuf>,

    /// Pretty-print the result JSON.
    #[arg(long)]
    pub pretty: bool,

    /// Print the SHA-256 result digest to stderr.
    #[arg(long)]
    pub digest: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub log_json: bool,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, default_value = "info", value_name = "FILTER")]
    pub log_level: String,
}

/// Output of one CLI run.
#[derive(Debug)]
pub struct Report {
    pub results: CalculationResults,
    pub json: String,
    pub digest: Option<String>,
}

pub fn parse_input(json: &str) -> Result<CalculationInput> {
    serde_json::from_str(json).context("input is not a valid expense document")
}

pub fn load_config(path: Option<&Path>) -> Result<SettlementConfig> {
    let Some(path) = path else {
        return Ok(SettlementConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    SettlementConfig::from_json(&raw).with_context(|| format!("invalid config {}", path.display()))
}

/// Compute and render results for an input document.
pub fn render(input: CalculationInput, config: &SettlementConfig, pretty: bool, digest: bool) -> Result<Report> {
    let results = compute_results(input, config)?;
    let json = if pretty {
        serde_json::to_string_pretty(&results)?
    } else {
        serde_json::to_string(&results)?
    };
    let digest = if digest {
        Some(results_digest_hex(&results)?)
    } else {
        None
    };
    Ok(Report {
        results,
        json,
        digest,
    })
}

/// Read the files named in `args` and render the report.
pub fn run(args: &Args) -> Result<Report> {
    let raw = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read input {}", args.input.display()))?;
    let input = parse_input(&raw)?;
    let config = load_config(args.config.as_deref())?;

    tracing::debug!(
        engine = ENGINE_NAME,
        version = VERSION,
        input = %args.input.display(),
        participants = input.participants.len(),
        expenses = input.expenses.len(),
        "Input loaded"
    );

    render(input, &config, args.pretty, args.digest)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    const INPUT: &str = r#"{
        "participants": ["A", "B", "C"],
        "expenses": [{ "id": "e1", "name": "Dinner", "payer": "A", "amount": "90",
                       "involvedParticipants": ["A", "B", "C"], "splitEvenly": true }]
    }"#;

    #[test]
    fn args_parse() {
        let args = Args::try_parse_from(["evensplit", "trip.json", "--config", "c.json", "--digest"]).unwrap();
        assert_eq!(args.input, PathBuf::from("trip.json"));
        assert_eq!(args.config, Some(PathBuf::from("c.json")));
        assert!(args.digest);
        assert!(!args.pretty);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn command_reports_engine_name_and_version() {
        use clap::CommandFactory;

        let command = Args::command();
        assert_eq!(command.get_name(), ENGINE_NAME);
        assert_eq!(command.get_version(), Some(VERSION));
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn input_is_required() {
        assert!(Args::try_parse_from(["evensplit"]).is_err());
    }

    #[test]
    fn render_scenario() {
        let report = render(parse_input(INPUT).unwrap(), &SettlementConfig::default(), false, true).unwrap();
        assert_eq!(report.results.balances.get("A"), Decimal::new(60, 0));
        assert!(report.json.contains("\"byExpense\""));
        assert!(!report.json.contains('\n'));
        assert_eq!(report.digest.as_deref().map(str::len), Some(64));
    }

    #[test]
    fn pretty_output_is_multiline() {
        let report = render(parse_input(INPUT).unwrap(), &SettlementConfig::default(), true, false).unwrap();
        assert!(report.json.contains('\n'));
        assert!(report.digest.is_none());
    }

    #[test]
    fn malformed_input_is_an_error() {
        assert!(parse_input("{ not json").is_err());
        assert!(parse_input(r#"{ "expenses": [] }"#).is_err());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let err = load_config(Some(Path::new("/nonexistent/evensplit.json"))).unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }

    #[test]
    fn no_config_means_defaults() {
        assert_eq!(load_config(None).unwrap(), SettlementConfig::default());
    }
}
