use super::{CommentaryInput, DetectionConfig, DetectionEngine, StepStatus};

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use rust_decimal::Decimal;

use crate::models::{DetectionError, FlagType, Ledger, MovementType, Significance, Transaction};

fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| anyhow!("invalid date {year}-{month}-{day}"))
}

fn create_ledger(rows: &[(&str, &str, i64)]) -> Result<Ledger> {
    let mut csv_content = String::from("Date,Account,Amount\n");

    for (date, account, amount) in rows {
        csv_content.push_str(&format!("{date},{account},{amount}\n"));
    }

    Ok(Ledger::from_reader(csv_content.as_bytes())?)
}

fn revenue_ledger() -> Result<Ledger> {
    create_ledger(&[
        ("2024-01-31", "Revenue", 100_000),
        ("2024-02-29", "Revenue", 85_000),
        ("2024-03-31", "Revenue", 120_000),
        ("2024-04-30", "Revenue", 95_000),
    ])
}

#[test]
fn test_engine_ranks_reference_scenario() -> Result<()> {
    let result = DetectionEngine::new().run(&revenue_ledger()?);

    assert!(result.success());
    assert!(result.errors().is_empty());

    let mom = result.mom_movements().ok_or_else(|| anyhow!("MoM movements missing"))?;
    let percentages: Vec<f64> = mom.iter().map(|movement| (movement.percentage_change * 100.0).round() / 100.0).collect();

    assert_eq!(percentages, vec![-15.0, 41.18, -20.83]);
    assert_eq!(result.yoy_movements().map(|movements| movements.len()), Some(0));
    assert_eq!(result.significant_movements().map(|movements| movements.len()), Some(3));

    let ranked = result.ranked_movements().ok_or_else(|| anyhow!("ranking missing"))?;

    assert_eq!(ranked.len(), 3);
    assert_eq!(ranked[0].rank, 1);
    assert!((ranked[0].movement().percentage_change - 41.18).abs() < 0.01);
    assert_eq!(ranked[0].classified.significance, Significance::Critical);

    for (index, pair) in ranked.windows(2).enumerate() {
        assert!(pair[0].classified.materiality_score >= pair[1].classified.materiality_score);
        assert_eq!(pair[1].rank, index + 2);
    }

    Ok(())
}

#[test]
fn test_engine_records_stats_for_every_step() -> Result<()> {
    let result = DetectionEngine::new().run(&revenue_ledger()?);
    let stats = result.per_step_stats();

    let monthly = stats.monthly_summary.stats().ok_or_else(|| anyhow!("monthly stats missing"))?;
    assert_eq!(monthly.accounts_processed, 1);
    assert_eq!(monthly.periods_processed, 4);
    assert_eq!(monthly.total_records, 4);

    assert_eq!(stats.mom_movements.stats().map(|mom| mom.total_movements), Some(3));
    assert_eq!(stats.yoy_movements.stats().map(|yoy| yoy.total_movements), Some(0));
    assert_eq!(stats.significant_movements.stats().map(|significant| significant.significant_movements_found), Some(3));
    assert!(stats.account_flags.is_success());
    assert_eq!(stats.ranking.stats().map(|ranking| ranking.total_movements), Some(3));

    Ok(())
}

#[test]
fn test_engine_stops_when_columns_are_missing() -> Result<()> {
    let ledger = Ledger::from_reader("posted,account,amount\n2024-01-31,Revenue,10".as_bytes())?;
    let result = DetectionEngine::new().run(&ledger);

    assert!(!result.success());
    assert!(result.monthly_summary().is_none());
    assert!(result.mom_movements().is_none());
    assert!(result.ranked_movements().is_none());
    assert!(result.account_flags().is_empty());
    assert_eq!(result.errors(), ["Monthly summary: Required columns (date) missing".to_string()]);
    assert!(matches!(result.per_step_stats().monthly_summary, StepStatus::Failed(_)));
    assert_eq!(result.per_step_stats().mom_movements, StepStatus::Skipped);
    assert_eq!(result.per_step_stats().ranking, StepStatus::Skipped);

    Ok(())
}

#[test]
fn test_engine_stops_on_malformed_rows() -> Result<()> {
    let ledger = Ledger::from_reader("date,account,amount\n2024-01-31,Revenue,10\nnot-a-date,Revenue,20".as_bytes())?;
    let result = DetectionEngine::new().run(&ledger);

    assert!(!result.success());
    assert_eq!(result.errors().len(), 1);
    assert!(result.errors()[0].starts_with("Monthly summary: Ledger row [2]"));

    Ok(())
}

#[test]
fn test_engine_keeps_going_when_mom_calculation_overflows() -> Result<()> {
    let transactions = vec![
        Transaction::new(date(2023, 1, 31)?, "Big", Decimal::new(1, 28)),
        Transaction::new(date(2023, 2, 28)?, "Big", Decimal::from_i128_with_scale(50_000_000_000_000_000_000_000_000_000, 0)),
        Transaction::new(date(2023, 1, 31)?, "Small", Decimal::from(100)),
        Transaction::new(date(2024, 1, 31)?, "Small", Decimal::from(200)),
        Transaction::new(date(2024, 2, 29)?, "Small", Decimal::from(210)),
    ];

    let result = DetectionEngine::new().run(&Ledger::from_transactions(&transactions));

    assert!(!result.success());
    assert_eq!(result.errors(), ["MoM movements: Numeric overflow for account [Big] in period [2023-02]".to_string()]);
    assert!(result.mom_movements().is_none());
    assert!(matches!(result.per_step_stats().mom_movements, StepStatus::Failed(_)));
    assert!(result.per_step_stats().yoy_movements.is_success());
    assert_eq!(result.yoy_movements().map(|movements| movements.len()), Some(1));

    let ranked = result.ranked_movements().ok_or_else(|| anyhow!("YoY movements were not ranked"))?;

    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].movement().account, "Small");
    assert_eq!(ranked[0].movement().movement_type, MovementType::YoY);
    assert!(result.per_step_stats().account_flags.is_success());

    Ok(())
}

#[test]
fn test_engine_records_invalid_thresholds_as_failed_classification() -> Result<()> {
    let result = DetectionEngine::new().with_mom_threshold(f64::NAN).run(&revenue_ledger()?);

    assert!(!result.success());
    assert_eq!(result.errors().len(), 1);
    assert!(result.errors()[0].starts_with("Significant movements: Threshold [mom_threshold]"));
    assert_eq!(result.mom_movements().map(|movements| movements.len()), Some(3));
    assert!(result.significant_movements().is_none());
    assert!(matches!(result.per_step_stats().significant_movements, StepStatus::Failed(_)));
    assert_eq!(result.per_step_stats().ranking, StepStatus::Skipped);
    assert!(result.per_step_stats().account_flags.is_success());

    Ok(())
}

#[test]
fn test_engine_treats_empty_ledger_as_successful_and_empty() -> Result<()> {
    let result = DetectionEngine::new().run(&create_ledger(&[])?);

    assert!(result.success());
    assert!(result.errors().is_empty());
    assert_eq!(result.monthly_summary().map(|summary| summary.len()), Some(0));
    assert!(result.significant_movements().is_none());
    assert!(result.ranked_movements().is_none());
    assert_eq!(
        result.per_step_stats().significant_movements,
        StepStatus::Failed(DetectionError::no_movements("analyze").to_string())
    );
    assert_eq!(result.per_step_stats().account_flags, StepStatus::Failed(DetectionError::NoData.to_string()));
    assert_eq!(result.per_step_stats().ranking, StepStatus::Skipped);

    Ok(())
}

#[test]
fn test_engine_degrades_when_nothing_clears_the_threshold() -> Result<()> {
    let ledger = create_ledger(&[
        ("2024-01-31", "Rent", -5_000),
        ("2024-02-29", "Rent", -5_100),
        ("2024-03-31", "Rent", -5_000),
    ])?;

    let result = DetectionEngine::new().run(&ledger);

    assert!(result.success());
    assert_eq!(result.significant_movements().map(|movements| movements.len()), Some(0));
    assert!(result.ranked_movements().is_none());
    assert!(result.top_movements(5).is_empty());
    assert_eq!(result.per_step_stats().ranking, StepStatus::Failed("No movements to rank".to_string()));

    Ok(())
}

#[test]
fn test_engine_applies_yoy_threshold_to_yoy_movements() -> Result<()> {
    let ledger = create_ledger(&[
        ("2023-01-31", "Revenue", 1_000),
        ("2023-06-30", "Revenue", 1_000),
        ("2024-01-31", "Revenue", 1_120),
        ("2024-06-30", "Revenue", 1_200),
    ])?;

    let result = DetectionEngine::new().run(&ledger);
    let significant = result.significant_movements().ok_or_else(|| anyhow!("classification missing"))?;

    let yoy: Vec<f64> = significant.iter()
        .filter(|movement| movement.movement.movement_type == MovementType::YoY)
        .map(|movement| movement.movement.percentage_change)
        .collect();

    assert_eq!(result.yoy_movements().map(|movements| movements.len()), Some(2));
    assert_eq!(yoy, vec![20.0]);

    Ok(())
}

#[test]
fn test_engine_does_not_bridge_missing_years() -> Result<()> {
    let ledger = create_ledger(&[
        ("2022-01-31", "Revenue", 100_000),
        ("2022-02-28", "Revenue", 110_000),
        ("2022-03-31", "Revenue", 120_000),
        ("2024-01-31", "Revenue", 120_000),
        ("2024-02-29", "Revenue", 143_000),
        ("2024-03-31", "Revenue", 150_000),
    ])?;

    let result = DetectionEngine::new().run(&ledger);

    assert!(result.success());
    assert_eq!(result.yoy_movements().map(|movements| movements.len()), Some(0));

    Ok(())
}

#[test]
fn test_engine_flags_accounts_independently_of_movements() -> Result<()> {
    let ledger = create_ledger(&[
        ("2024-01-31", "Revenue", 100),
        ("2024-02-29", "Revenue", 100),
        ("2024-03-31", "Revenue", 100),
        ("2024-04-30", "Revenue", 100),
        ("2024-03-31", "Consulting", 50),
        ("2024-04-30", "Consulting", 50),
        ("2024-01-31", "Legacy", 10),
    ])?;

    let result = DetectionEngine::new().run(&ledger);
    let flags = result.account_flags();

    assert_eq!(flags.len(), 2);
    assert_eq!(flags[0].account, "Consulting");
    assert_eq!(flags[0].flag_type, FlagType::New);
    assert_eq!(flags[1].account, "Legacy");
    assert_eq!(flags[1].flag_type, FlagType::Discontinued);
    assert!(result.ranked_movements().is_none());

    Ok(())
}

#[test]
fn test_engine_runs_are_idempotent() -> Result<()> {
    let ledger = create_ledger(&[
        ("2023-01-31", "Revenue", 900),
        ("2024-01-31", "Revenue", 1_000),
        ("2024-02-29", "Revenue", 1_500),
        ("2024-01-31", "Payroll", -700),
        ("2024-02-29", "Payroll", -350),
    ])?;

    let engine = DetectionEngine::new();

    assert_eq!(engine.run(&ledger), engine.run(&ledger));

    Ok(())
}

#[test]
fn test_lowering_mom_threshold_only_adds_movements() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(11);
    let mut rows = Vec::new();

    for account in ["Revenue", "Payroll", "Travel", "Utilities"] {
        for month in 1..=12u32 {
            let date = format!("2024-{month:02}-15");
            rows.push((date, account, rng.random_range(-20_000i64..20_000)));
        }
    }

    let borrowed: Vec<(&str, &str, i64)> = rows.iter().map(|(date, account, amount)| (date.as_str(), *account, *amount)).collect();
    let ledger = create_ledger(&borrowed)?;

    let strict = DetectionEngine::new().with_mom_threshold(25.0).run(&ledger);
    let relaxed = DetectionEngine::new().with_mom_threshold(5.0).run(&ledger);

    let strict_movements = strict.significant_movements().unwrap_or_default();
    let relaxed_movements = relaxed.significant_movements().unwrap_or_default();

    assert!(relaxed_movements.len() >= strict_movements.len());

    for kept in strict_movements {
        assert!(relaxed_movements.iter().any(|candidate| candidate.movement == kept.movement));
    }

    Ok(())
}

#[test]
fn test_config_defaults_and_validation() {
    let config = DetectionConfig::default();

    assert_eq!(config.mom_threshold, 10.0);
    assert_eq!(config.yoy_threshold, 15.0);
    assert_eq!(config.threshold_for(MovementType::YoY), 15.0);
    assert!(config.validate().is_ok());
    assert!(config.with_mom_threshold(0.0).validate().is_ok());

    assert!(matches!(
        config.with_mom_threshold(-1.0).validate(),
        Err(DetectionError::InvalidThreshold { name: "mom_threshold", .. })
    ));
    assert!(matches!(
        config.with_yoy_threshold(f64::NAN).validate(),
        Err(DetectionError::InvalidThreshold { name: "yoy_threshold", .. })
    ));

    let engine = DetectionEngine::new().with_config(config.with_yoy_threshold(20.0));

    assert_eq!(engine.config().yoy_threshold, 20.0);
}

#[test]
fn test_account_context_summarizes_history_and_flag() -> Result<()> {
    let ledger = create_ledger(&[
        ("2023-03-31", "Revenue", 800),
        ("2024-02-29", "Revenue", 1_000),
        ("2024-03-31", "Revenue", 1_300),
        ("2024-02-29", "Consulting", 40),
        ("2024-03-31", "Consulting", 60),
    ])?;

    let result = DetectionEngine::new().run(&ledger);

    let revenue = result.account_context("Revenue");
    assert_eq!(revenue.mom_movements, 2);
    assert_eq!(revenue.yoy_movements, 1);
    assert_eq!(revenue.accounts_processed, 2);
    assert_eq!(revenue.periods_processed, 3);

    let consulting = result.account_context("Consulting");
    assert_eq!(consulting.flag.map(|flag| flag.flag_type), Some(FlagType::New));
    assert_eq!(consulting.yoy_movements, 0);

    assert!(result.account_context("Unknown").flag.is_none());

    Ok(())
}

#[test]
fn test_commentary_inputs_follow_ranking() -> Result<()> {
    let result = DetectionEngine::new().run(&revenue_ledger()?);

    let inputs = result.commentary_inputs(2);
    let top = result.top_movements(2);

    assert_eq!(inputs.len(), 2);
    assert_eq!(inputs[0], CommentaryInput::from(&top[0]));
    assert_eq!(inputs[0].account, "Revenue");
    assert_eq!(inputs[0].movement_type, MovementType::MoM);
    assert_eq!(inputs[0].significance, Significance::Critical);
    assert_eq!(inputs[0].current_amount, top[0].movement().current_amount);
    assert_eq!(result.top_movements(10).len(), 3);

    Ok(())
}
