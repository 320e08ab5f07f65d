use std::fmt;
use std::fmt::{Display, Formatter};

use crate::analysis::{AggregationStats, LifecycleStats, MovementStats, RankingStats, ThresholdStats};
use crate::models::{AccountFlag, ClassifiedMovement, MonthlyAggregate, Movement, RankedMovement};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Step {
    MonthlySummary,
    MomMovements,
    YoyMovements,
    SignificantMovements,
    AccountFlags,
    Ranking
}

impl Display for Step {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            Step::MonthlySummary => "Monthly summary",
            Step::MomMovements => "MoM movements",
            Step::YoyMovements => "YoY movements",
            Step::SignificantMovements => "Significant movements",
            Step::AccountFlags => "Account flags",
            Step::Ranking => "Ranking"
        };

        write!(formatter, "{label}")
    }
}

/// Outcome of one pipeline step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepStatus<T> {
    Succeeded(T),
    Failed(String),
    /// Not run because the step feeding it produced nothing.
    Skipped
}

impl<T> StepStatus<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, StepStatus::Succeeded(_))
    }

    pub fn stats(&self) -> Option<&T> {
        match self {
            StepStatus::Succeeded(stats) => Some(stats),
            _ => None
        }
    }
}

impl<T> Default for StepStatus<T> {
    fn default() -> Self {
        StepStatus::Skipped
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepStats {
    pub monthly_summary: StepStatus<AggregationStats>,
    pub mom_movements: StepStatus<MovementStats>,
    pub yoy_movements: StepStatus<MovementStats>,
    pub significant_movements: StepStatus<ThresholdStats>,
    pub account_flags: StepStatus<LifecycleStats>,
    pub ranking: StepStatus<RankingStats>
}

/// Everything one engine run produced.
///
/// A `None` artifact means its step failed or never ran; `per_step_stats`
/// says which.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionResult {
    pub(crate) success: bool,
    pub(crate) monthly_summary: Option<Vec<MonthlyAggregate>>,
    pub(crate) mom_movements: Option<Vec<Movement>>,
    pub(crate) yoy_movements: Option<Vec<Movement>>,
    pub(crate) significant_movements: Option<Vec<ClassifiedMovement>>,
    pub(crate) account_flags: Vec<AccountFlag>,
    pub(crate) ranked_movements: Option<Vec<RankedMovement>>,
    pub(crate) per_step_stats: StepStats,
    pub(crate) errors: Vec<String>
}

impl DetectionResult {
    pub fn success(&self) -> bool {
        self.success
    }

    pub fn monthly_summary(&self) -> Option<&[MonthlyAggregate]> {
        self.monthly_summary.as_deref()
    }

    pub fn mom_movements(&self) -> Option<&[Movement]> {
        self.mom_movements.as_deref()
    }

    pub fn yoy_movements(&self) -> Option<&[Movement]> {
        self.yoy_movements.as_deref()
    }

    pub fn significant_movements(&self) -> Option<&[ClassifiedMovement]> {
        self.significant_movements.as_deref()
    }

    pub fn account_flags(&self) -> &[AccountFlag] {
        &self.account_flags
    }

    pub fn ranked_movements(&self) -> Option<&[RankedMovement]> {
        self.ranked_movements.as_deref()
    }

    pub fn per_step_stats(&self) -> &StepStats {
        &self.per_step_stats
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// The `count` most material movements (fewer if not that many were ranked).
    pub fn top_movements(&self, count: usize) -> &[RankedMovement] {
        let ranked = self.ranked_movements().unwrap_or_default();
        &ranked[..count.min(ranked.len())]
    }
}
