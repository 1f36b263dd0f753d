use std::path::PathBuf;

use evensplit_cli::{Args, run};
use rust_decimal::Decimal;

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .join(name)
}

fn args(config: Option<PathBuf>) -> Args {
    Args {
        input: demo("trip.json"),
        config,
        pretty: false,
        digest: true,
        log_json: false,
        log_level: "info".into(),
    }
}

#[test]
fn trip_with_defaults() {
    let report = run(&args(None)).unwrap();
    let results = &report.results;

    assert_eq!(results.balances.get("alice"), Decimal::new(-20, 0));
    assert_eq!(results.balances.get("bob"), Decimal::new(110, 0));
    assert_eq!(results.balances.get("carol"), Decimal::new(-90, 0));

    let summary = &results.transactions.summary;
    assert_eq!(summary.amount("bob", "alice"), Decimal::new(30, 0));
    assert_eq!(summary.amount("carol", "alice"), Decimal::new(30, 0));
    assert_eq!(summary.amount("alice", "bob"), Decimal::new(80, 0));
    assert_eq!(summary.amount("carol", "bob"), Decimal::new(60, 0));
    assert!(results.net_settlement.is_none());
    assert!(results.is_clean());
}

#[test]
fn trip_with_config_adds_net_plan() {
    let report = run(&args(Some(demo("settle.json")))).unwrap();
    let net = report.results.net_settlement.as_ref().unwrap();
    assert_eq!(net.amount("carol", "bob"), Decimal::new(90, 0));
    assert_eq!(net.amount("alice", "bob"), Decimal::new(20, 0));
    assert_eq!(net.len(), 2);
    assert!(report.json.contains("\"netSettlement\""));
}

#[test]
fn digest_is_stable_across_runs() {
    let first = run(&args(None)).unwrap();
    let second = run(&args(None)).unwrap();
    assert!(first.digest.is_some());
    assert_eq!(first.digest, second.digest);
    assert_eq!(first.json, second.json);
}

#[test]
fn missing_input_file_fails() {
    let mut bad = args(None);
    bad.input = demo("does-not-exist.json");
    let err = run(&bad).unwrap_err();
    assert!(format!("{err:#}").contains("failed to read input"));
}
