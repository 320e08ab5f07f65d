use tracing::{info, warn};

use crate::analysis::{
    apply_movement_thresholds, calculate_mom_movements, calculate_monthly_summaries, calculate_yoy_movements,
    detect_account_flags, rank_movements_by_significance
};
use crate::engine::config::DetectionConfig;
use crate::engine::result::{DetectionResult, Step, StepStatus};
use crate::models::{DetectionError, Ledger, Movement};

/// Movement detection pipeline over an in-memory ledger.
///
/// Each run is a pure function of the ledger and the configured thresholds.
#[derive(Debug, Clone, Default)]
pub struct DetectionEngine {
    config: DetectionConfig
}

impl DetectionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: DetectionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_mom_threshold(mut self, threshold: f64) -> Self {
        self.config = self.config.with_mom_threshold(threshold);
        self
    }

    pub fn with_yoy_threshold(mut self, threshold: f64) -> Self {
        self.config = self.config.with_yoy_threshold(threshold);
        self
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Runs every step and assembles the result envelope.
    ///
    /// Only a failed monthly aggregation stops the run. Other step failures are
    /// recorded in `per_step_stats`; those that are not plain empty-input
    /// conditions are also listed in `errors` and clear `success`. Invalid
    /// thresholds fail the classification step.
    pub fn run(&self, ledger: &Ledger) -> DetectionResult {
        let mut result = DetectionResult::default();
        let mut errors = Vec::new();

        let monthly_summary = match calculate_monthly_summaries(ledger) {
            Ok((summary, stats)) => {
                info!("Monthly summary: {} accounts over {} periods", stats.accounts_processed, stats.periods_processed);
                result.per_step_stats.monthly_summary = StepStatus::Succeeded(stats);
                summary
            },
            Err(error) => {
                result.per_step_stats.monthly_summary = record_failure(Step::MonthlySummary, &error, &mut errors);
                result.errors = errors;
                return result;
            }
        };

        let mom_movements = match calculate_mom_movements(&monthly_summary) {
            Ok((movements, stats)) => {
                result.per_step_stats.mom_movements = StepStatus::Succeeded(stats);
                Some(movements)
            },
            Err(error) => {
                result.per_step_stats.mom_movements = record_failure(Step::MomMovements, &error, &mut errors);
                None
            }
        };

        let yoy_movements = match calculate_yoy_movements(&monthly_summary) {
            Ok((movements, stats)) => {
                result.per_step_stats.yoy_movements = StepStatus::Succeeded(stats);
                Some(movements)
            },
            Err(error) => {
                result.per_step_stats.yoy_movements = record_failure(Step::YoyMovements, &error, &mut errors);
                None
            }
        };

        let combined: Vec<Movement> = mom_movements.iter()
            .chain(yoy_movements.iter())
            .flatten()
            .cloned()
            .collect();

        let significant_movements = match apply_movement_thresholds(&combined, &self.config) {
            Ok((significant, stats)) => {
                result.per_step_stats.significant_movements = StepStatus::Succeeded(stats);
                Some(significant)
            },
            Err(error) => {
                result.per_step_stats.significant_movements = record_failure(Step::SignificantMovements, &error, &mut errors);
                None
            }
        };

        match detect_account_flags(&monthly_summary) {
            Ok((flags, stats)) => {
                result.per_step_stats.account_flags = StepStatus::Succeeded(stats);
                result.account_flags = flags;
            },
            Err(error) => {
                result.per_step_stats.account_flags = record_failure(Step::AccountFlags, &error, &mut errors);
            }
        }

        if let Some(significant) = &significant_movements {
            match rank_movements_by_significance(significant) {
                Ok((ranked, stats)) => {
                    result.per_step_stats.ranking = StepStatus::Succeeded(stats);
                    result.ranked_movements = Some(ranked);
                },
                Err(error) => {
                    result.per_step_stats.ranking = record_failure(Step::Ranking, &error, &mut errors);
                }
            }
        }

        result.success = errors.is_empty();
        result.monthly_summary = Some(monthly_summary);
        result.mom_movements = mom_movements;
        result.yoy_movements = yoy_movements;
        result.significant_movements = significant_movements;
        result.errors = errors;

        result
    }
}

fn record_failure<T>(step: Step, error: &DetectionError, errors: &mut Vec<String>) -> StepStatus<T> {
    if error.is_empty_input() {
        info!("{step}: {error}");
    } else {
        warn!("{step}: {error}");
        errors.push(format!("{step}: {error}"));
    }

    StepStatus::Failed(error.to_string())
}
