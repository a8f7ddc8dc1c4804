//! End-to-end tests of the `albany` binary

use std::path::PathBuf;
use std::process::{Command, Output};

fn albany(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_albany"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .unwrap()
}

/// 20 monthly rows with `y = 0.01 + 2 SMB`; HML is unrelated.
fn write_panel(file_name: &str) -> PathBuf {
    let dates: Vec<String> = (0..20)
        .map(|i| format!("{}-{:02}-01", 2010 + i / 12, i % 12 + 1))
        .collect();
    let smb: Vec<f64> = (0..20).map(|i| 0.02 * (i as f64 * 0.9).sin()).collect();
    let hml: Vec<f64> = (0..20).map(|i| 0.02 * (i as f64 * 0.4).cos()).collect();
    let y: Vec<f64> = smb.iter().map(|s| 0.01 + 2.0 * s).collect();

    let doc = serde_json::json!({
        "dates": dates,
        "columns": { "y": y, "SMB": smb, "HML": hml },
    });
    let path = std::env::temp_dir().join(format!("{}-{file_name}", std::process::id()));
    std::fs::write(&path, doc.to_string()).unwrap();
    path
}

#[test]
fn test_factors_lists_universe() {
    let output = albany(&["factors"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    for name in ["Mkt-RF", "SMB", "HML", "RMW", "CMA", "Mom"] {
        assert!(stdout.contains(name));
    }
}

#[test]
fn test_regress_json() {
    let panel = write_panel("regress.json");
    let output = albany(&[
        "regress",
        "--panel",
        panel.to_str().unwrap(),
        "--dependent",
        "y",
        "--window",
        "8",
        "--format",
        "json",
    ]);
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["title"], "Rolling regression: y");
    let records = report["contents"]["records"].as_array().unwrap();
    assert_eq!(records.len(), 12);
    assert_eq!(records[0]["date"], "2010-09-01");
    let beta = records[0]["beta_SMB"].as_f64().unwrap();
    assert!((beta - 2.0).abs() < 1e-6);
}

#[test]
fn test_regress_text() {
    let panel = write_panel("regress-text.json");
    let output = albany(&[
        "regress",
        "--panel",
        panel.to_str().unwrap(),
        "--dependent",
        "y",
        "--window",
        "8",
        "--regressors",
        "SMB",
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Rolling Alpha and Betas (SMB)"));
    assert!(stdout.contains("beta_SMB"));
    assert!(!stdout.contains("beta_HML"));
}

#[test]
fn test_missing_column_fails() {
    let panel = write_panel("missing.json");
    let output = albany(&[
        "stats",
        "--panel",
        panel.to_str().unwrap(),
        "--column",
        "Innovation",
    ]);
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.starts_with("Error:"));
    assert!(stderr.contains("Innovation"));
}

#[test]
fn test_correlate_self() {
    let panel = write_panel("correlate.json");
    let output = albany(&[
        "correlate",
        "--panel",
        panel.to_str().unwrap(),
        "--left",
        "SMB",
        "--right",
        "y",
        "--window",
        "6",
        "--format",
        "json",
    ]);
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let corr = report["contents"]["correlation"].as_f64().unwrap();
    assert!((corr - 1.0).abs() < 1e-9);
    assert_eq!(report["contents"]["rolling"]["values"].as_array().unwrap().len(), 15);
}
