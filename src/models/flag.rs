use std::fmt;
use std::fmt::{Display, Formatter};

use chrono::NaiveDate;

use crate::types::AccountName;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum FlagType {
    New,
    Discontinued,
    InsufficientHistory
}

impl Display for FlagType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FlagType::New => write!(formatter, "New"),
            FlagType::Discontinued => write!(formatter, "Discontinued"),
            FlagType::InsufficientHistory => write!(formatter, "Insufficient History")
        }
    }
}

/// Marks an account whose trend comparisons should not be trusted.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountFlag {
    pub account: AccountName,
    /// Highest-precedence condition the account meets.
    pub flag_type: FlagType,
    /// Every condition the account meets, in precedence order.
    pub conditions: Vec<FlagType>,
    /// Distinct periods with data.
    pub months_active: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub months_since_start: f64,
    pub months_since_last: f64
}
