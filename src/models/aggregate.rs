use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::types::{AccountName, Period};

/// Net activity of one account in one calendar month.
///
/// There is exactly one aggregate per (account, period). Months without
/// transactions have no aggregate at all.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyAggregate {
    pub account: AccountName,
    pub period: Period,
    /// Sum of every transaction amount in the period.
    pub amount: Decimal,
    /// Latest transaction date seen in the period.
    pub representative_date: NaiveDate
}

impl MonthlyAggregate {
    pub fn year(&self) -> i32 {
        self.period.year()
    }

    pub fn month(&self) -> u32 {
        self.period.month()
    }
}
