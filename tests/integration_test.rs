use std::process::Command;
use std::path::Path;
use anyhow::Result;

#[test]
fn test_cli_ranks_sample_movements_by_materiality() -> Result<()> {
    let binary_path = env!("CARGO_BIN_EXE_movement-detection-engine");
    let sample_path = Path::new("samples").join("ledger.csv");

    let output = Command::new(binary_path)
        .arg(sample_path)
        .output()?;

    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let mut lines = stdout.lines();

    assert_eq!(
        lines.next(),
        Some("rank,account,movement_type,current_period,previous_period,current_amount,previous_amount,percentage_change,absolute_change,significance,materiality_score")
    );

    let rows: Vec<Vec<&str>> = lines.map(|line| line.split(',').collect()).collect();

    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0], vec!["1", "Revenue", "MoM", "2024-03", "2024-02", "120000", "85000", "41.18", "35000", "Critical", "64.71"]);

    let ranks: Vec<&str> = rows.iter().map(|fields| fields[0]).collect();
    assert_eq!(ranks, vec!["1", "2", "3", "4"]);

    let mut previous_score = f64::MAX;

    for fields in &rows {
        assert_eq!(fields.len(), 11);
        assert_ne!(fields[1], "Rent");

        let score: f64 = fields[10].parse()?;
        assert!(score <= previous_score);
        previous_score = score;
    }

    Ok(())
}

#[test]
fn test_cli_top_limits_report_length() -> Result<()> {
    let binary_path = env!("CARGO_BIN_EXE_movement-detection-engine");
    let sample_path = Path::new("samples").join("ledger.csv");

    let output = Command::new(binary_path)
        .arg(sample_path)
        .args(["--top", "2"])
        .output()?;

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout)?.lines().count(), 3);

    Ok(())
}

#[test]
fn test_cli_raising_threshold_drops_movements() -> Result<()> {
    let binary_path = env!("CARGO_BIN_EXE_movement-detection-engine");
    let sample_path = Path::new("samples").join("ledger.csv");

    let output = Command::new(binary_path)
        .arg(sample_path)
        .args(["--mom-threshold", "40"])
        .output()?;

    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let accounts: Vec<&str> = stdout.lines().skip(1).map(|line| line.split(',').nth(1).unwrap_or_default()).collect();

    assert_eq!(accounts, vec!["Revenue", "Consulting"]);

    Ok(())
}

#[test]
fn test_cli_reports_account_flags() -> Result<()> {
    let binary_path = env!("CARGO_BIN_EXE_movement-detection-engine");
    let sample_path = Path::new("samples").join("ledger.csv");

    let output = Command::new(binary_path)
        .arg(sample_path)
        .args(["--report", "flags"])
        .output()?;

    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let lines: Vec<&str> = stdout.lines().collect();

    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("Consulting,New,New|Insufficient History,2,2024-03-31,2024-04-30,"));

    Ok(())
}

#[test]
fn test_cli_fails_when_required_columns_are_missing() -> Result<()> {
    let binary_path = env!("CARGO_BIN_EXE_movement-detection-engine");
    let fixture_path = Path::new("samples").join("missing_columns.csv");

    let output = Command::new(binary_path)
        .arg(fixture_path)
        .output()?;

    assert!(!output.status.success());
    assert!(String::from_utf8(output.stderr)?.contains("Required columns (account) missing"));

    Ok(())
}

#[test]
fn test_cli_fails_for_missing_ledger_file() -> Result<()> {
    let binary_path = env!("CARGO_BIN_EXE_movement-detection-engine");

    let output = Command::new(binary_path)
        .arg("missing.csv")
        .output()?;

    assert!(!output.status.success());
    assert!(String::from_utf8(output.stderr)?.contains("Error opening ledger at path: missing.csv"));

    Ok(())
}
