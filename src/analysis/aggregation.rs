use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{DetectionError, Ledger, MonthlyAggregate};
use crate::types::{AccountName, Period};

#[derive(Debug, Clone, PartialEq)]
pub struct AggregationStats {
    pub accounts_processed: usize,
    pub periods_processed: usize,
    pub total_records: usize
}

/// Collapses the ledger into one total per account and calendar month.
///
/// # Errors
/// - `MissingColumns` when a required column cannot be resolved.
/// - `InvalidRecord` when a row's date or amount cannot be read.
/// - `Overflow` when a monthly sum exceeds the decimal range.
pub fn calculate_monthly_summaries(ledger: &Ledger) -> Result<(Vec<MonthlyAggregate>, AggregationStats), DetectionError> {
    let transactions = ledger.transactions()?;
    let mut groups = BTreeMap::<(AccountName, Period), (Decimal, NaiveDate)>::new();

    for transaction in transactions {
        let period = Period::from_date(transaction.date);
        let key = (transaction.account, period);

        match groups.get_mut(&key) {
            Some((amount, latest)) => {
                *amount = amount.checked_add(transaction.amount)
                    .ok_or_else(|| DetectionError::overflow(&key.0, period))?;
                *latest = (*latest).max(transaction.date);
            },
            None => {
                groups.insert(key, (transaction.amount, transaction.date));
            }
        }
    }

    let summary: Vec<MonthlyAggregate> = groups.into_iter()
        .map(|((account, period), (amount, representative_date))| MonthlyAggregate {
            account,
            period,
            amount,
            representative_date
        })
        .collect();

    let stats = AggregationStats {
        accounts_processed: summary.iter().map(|row| row.account.as_str()).collect::<HashSet<_>>().len(),
        periods_processed: summary.iter().map(|row| row.period).collect::<HashSet<_>>().len(),
        total_records: summary.len()
    };

    debug!("Aggregated {} ledger rows into {} monthly records", ledger.len(), stats.total_records);

    Ok((summary, stats))
}

/// Groups aggregates by account with each account's rows in chronological order.
pub(crate) fn group_by_account(aggregates: &[MonthlyAggregate]) -> BTreeMap<&str, Vec<&MonthlyAggregate>> {
    let mut accounts = BTreeMap::<&str, Vec<&MonthlyAggregate>>::new();

    for aggregate in aggregates {
        accounts.entry(aggregate.account.as_str()).or_default().push(aggregate);
    }

    for rows in accounts.values_mut() {
        rows.sort_by_key(|row| (row.period, row.representative_date));
    }

    accounts
}
