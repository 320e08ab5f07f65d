use std::io::{stderr, stdout, BufWriter};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use csv::Writer;
use tokio::task::spawn_blocking;
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use movement_detection::engine::{DEFAULT_MOM_THRESHOLD, DEFAULT_YOY_THRESHOLD};
use movement_detection::{DetectionConfig, DetectionEngine, DetectionResult, Ledger};

/// Detects material month-over-month and year-over-year account movements in a ledger.
#[derive(Debug, Parser)]
#[command(name = "movement-detection-engine", version)]
struct Args {
    /// Ledger CSV with date, account and amount columns
    input: PathBuf,

    /// Minimum |% change| for a month-over-month movement to be significant
    #[arg(long, env = "MOVEMENT_MOM_THRESHOLD", default_value_t = DEFAULT_MOM_THRESHOLD)]
    mom_threshold: f64,

    /// Minimum |% change| for a year-over-year movement to be significant
    #[arg(long, env = "MOVEMENT_YOY_THRESHOLD", default_value_t = DEFAULT_YOY_THRESHOLD)]
    yoy_threshold: f64,

    /// Only report the N most material movements
    #[arg(long)]
    top: Option<usize>,

    /// Which report to write to stdout
    #[arg(long, value_enum, default_value_t = Report::Movements)]
    report: Report,

    /// error, warn, info, debug or trace
    #[arg(long, default_value = "error")]
    log_level: LevelFilter
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Report {
    Movements,
    Flags
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(args.log_level);

    let config = DetectionConfig::new()
        .with_mom_threshold(args.mom_threshold)
        .with_yoy_threshold(args.yoy_threshold);

    config.validate()?;

    let timer = Instant::now();
    let ledger = load_ledger(args.input).await?;
    let engine = DetectionEngine::new().with_config(config);
    let result = spawn_blocking(move || engine.run(&ledger)).await?;

    info!("Analyzed ledger in: {:?}", timer.elapsed());

    for message in result.errors() {
        warn!("{message}");
    }

    if result.monthly_summary().is_none() {
        return Err(anyhow!(result.errors().join("; ")));
    }

    match args.report {
        Report::Movements => write_movements_to_stdout(&result, args.top),
        Report::Flags => write_flags_to_stdout(&result)
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: stdout carries the report, so logs go to stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

async fn load_ledger(path: PathBuf) -> Result<Ledger> {
    let display_path = path.display().to_string();

    spawn_blocking(move || Ledger::from_path(&path))
        .await?
        .with_context(|| format!("Error opening ledger at path: {display_path}"))
}

fn write_movements_to_stdout(result: &DetectionResult, top: Option<usize>) -> Result<()> {
    let ranked = match top {
        Some(count) => result.top_movements(count),
        None => result.ranked_movements().unwrap_or_default()
    };

    let mut output = Writer::from_writer(BufWriter::new(stdout().lock()));

    output.write_record([
        "rank", "account", "movement_type", "current_period", "previous_period", "current_amount",
        "previous_amount", "percentage_change", "absolute_change", "significance", "materiality_score"
    ])?;

    for ranked_movement in ranked {
        let movement = ranked_movement.movement();

        output.write_record([
            ranked_movement.rank.to_string(),
            movement.account.clone(),
            movement.movement_type.to_string(),
            movement.current_period.to_string(),
            movement.previous_period.to_string(),
            movement.current_amount.to_string(),
            movement.previous_amount.to_string(),
            format!("{:.2}", movement.percentage_change),
            movement.absolute_change.to_string(),
            ranked_movement.classified.significance.to_string(),
            format!("{:.2}", ranked_movement.classified.materiality_score)
        ])?;
    }

    output.flush()?;

    Ok(())
}

fn write_flags_to_stdout(result: &DetectionResult) -> Result<()> {
    let mut output = Writer::from_writer(BufWriter::new(stdout().lock()));

    output.write_record([
        "account", "flag_type", "conditions", "months_active", "start_date", "end_date",
        "months_since_start", "months_since_last"
    ])?;

    for flag in result.account_flags() {
        let conditions: Vec<String> = flag.conditions.iter().map(|condition| condition.to_string()).collect();

        output.write_record([
            flag.account.clone(),
            flag.flag_type.to_string(),
            conditions.join("|"),
            flag.months_active.to_string(),
            flag.start_date.to_string(),
            flag.end_date.to_string(),
            format!("{:.1}", flag.months_since_start),
            format!("{:.1}", flag.months_since_last)
        ])?;
    }

    output.flush()?;

    Ok(())
}
