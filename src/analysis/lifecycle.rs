use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::debug;

use crate::analysis::aggregation::group_by_account;
use crate::models::{AccountFlag, DetectionError, FlagType, MonthlyAggregate};

pub const AVERAGE_DAYS_PER_MONTH: f64 = 30.44;
/// Accounts first seen this many months (or fewer) before the dataset's end are new.
pub const NEW_ACCOUNT_MONTHS: f64 = 2.0;
/// Accounts silent for longer than this many months are discontinued.
pub const DISCONTINUED_AFTER_MONTHS: f64 = 2.0;
pub const MINIMUM_HISTORY_MONTHS: usize = 3;

/// Activity window of a single account measured against the dataset's latest date.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountActivity {
    pub months_active: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub months_since_start: f64,
    pub months_since_last: f64
}

impl AccountActivity {
    pub fn new(rows: &[&MonthlyAggregate], current_date: NaiveDate) -> Option<Self> {
        let start_date = rows.iter().map(|row| row.representative_date).min()?;
        let end_date = rows.iter().map(|row| row.representative_date).max()?;

        Some(Self {
            months_active: rows.iter().map(|row| row.period).collect::<HashSet<_>>().len(),
            start_date,
            end_date,
            months_since_start: months_between(start_date, current_date),
            months_since_last: months_between(end_date, current_date)
        })
    }
}

pub struct FlagRule {
    pub flag_type: FlagType,
    pub applies: fn(&AccountActivity) -> bool
}

/// Lifecycle rules in precedence order. The first rule that applies names the flag.
pub const FLAG_PRECEDENCE: [FlagRule; 3] = [
    FlagRule { flag_type: FlagType::New, applies: is_new },
    FlagRule { flag_type: FlagType::Discontinued, applies: is_discontinued },
    FlagRule { flag_type: FlagType::InsufficientHistory, applies: has_insufficient_history }
];

#[derive(Debug, Clone, PartialEq)]
pub struct LifecycleStats {
    pub total_accounts_analyzed: usize,
    pub flagged_accounts: usize,
    pub new_accounts: usize,
    pub discontinued_accounts: usize,
    pub insufficient_history_accounts: usize
}

fn is_new(activity: &AccountActivity) -> bool {
    activity.months_since_start <= NEW_ACCOUNT_MONTHS
}

fn is_discontinued(activity: &AccountActivity) -> bool {
    activity.months_since_last > DISCONTINUED_AFTER_MONTHS
}

fn has_insufficient_history(activity: &AccountActivity) -> bool {
    activity.months_active < MINIMUM_HISTORY_MONTHS
}

fn months_between(from: NaiveDate, to: NaiveDate) -> f64 {
    (to - from).num_days() as f64 / AVERAGE_DAYS_PER_MONTH
}

/// Every lifecycle condition the activity meets, in precedence order.
pub fn matching_flags(activity: &AccountActivity) -> Vec<FlagType> {
    FLAG_PRECEDENCE.iter()
        .filter(|rule| (rule.applies)(activity))
        .map(|rule| rule.flag_type)
        .collect()
}

/// Flags new, discontinued and short-history accounts.
///
/// Every account is measured against one reference date: the latest
/// representative date in the whole dataset.
///
/// # Errors
/// Returns `NoData` when `aggregates` is empty.
pub fn detect_account_flags(aggregates: &[MonthlyAggregate]) -> Result<(Vec<AccountFlag>, LifecycleStats), DetectionError> {
    let Some(current_date) = aggregates.iter().map(|row| row.representative_date).max() else {
        return Err(DetectionError::NoData);
    };

    let accounts = group_by_account(aggregates);
    let mut flags = Vec::new();

    for (account, rows) in &accounts {
        let Some(activity) = AccountActivity::new(rows, current_date) else {
            continue;
        };

        let conditions = matching_flags(&activity);

        if let Some(&flag_type) = conditions.first() {
            flags.push(AccountFlag {
                account: account.to_string(),
                flag_type,
                conditions,
                months_active: activity.months_active,
                start_date: activity.start_date,
                end_date: activity.end_date,
                months_since_start: activity.months_since_start,
                months_since_last: activity.months_since_last
            });
        }
    }

    let count = |flag_type: FlagType| flags.iter().filter(|flag| flag.flag_type == flag_type).count();

    let stats = LifecycleStats {
        total_accounts_analyzed: accounts.len(),
        flagged_accounts: flags.len(),
        new_accounts: count(FlagType::New),
        discontinued_accounts: count(FlagType::Discontinued),
        insufficient_history_accounts: count(FlagType::InsufficientHistory)
    };

    debug!("Flagged {} of {} accounts as of {current_date}", stats.flagged_accounts, stats.total_accounts_analyzed);

    Ok((flags, stats))
}
