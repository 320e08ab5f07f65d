mod aggregation;
mod lifecycle;
mod movements;
mod ranking;
mod thresholds;

pub use aggregation::{calculate_monthly_summaries, AggregationStats};
pub use lifecycle::{
    detect_account_flags, matching_flags, AccountActivity, FlagRule, LifecycleStats, AVERAGE_DAYS_PER_MONTH,
    DISCONTINUED_AFTER_MONTHS, FLAG_PRECEDENCE, MINIMUM_HISTORY_MONTHS, NEW_ACCOUNT_MONTHS
};
pub use movements::{calculate_mom_movements, calculate_yoy_movements, percentage_change, MovementStats};
pub use ranking::{rank_movements_by_significance, RankingStats};
pub use thresholds::{apply_movement_thresholds, classify_significance, ThresholdStats, ABSOLUTE_WEIGHT, PERCENTAGE_WEIGHT};
