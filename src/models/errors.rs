use crate::types::{AccountName, Period};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("Required columns ({}) missing", .missing.join(", "))]
    MissingColumns {
        missing: Vec<String>
    },
    #[error("Required columns ({}) appear more than once", .duplicated.join(", "))]
    AmbiguousColumns {
        duplicated: Vec<String>
    },
    #[error("Ledger row [{row}] could not be read: {reason}")]
    InvalidRecord {
        row: usize,
        reason: String
    },
    #[error("Ledger could not be read: {0}")]
    Csv(#[from] csv::Error),
    #[error("Ledger could not be opened: {0}")]
    Io(#[from] std::io::Error),
    #[error("No data to analyze")]
    NoData,
    #[error("No movements to {action}")]
    NoMovements {
        action: &'static str
    },
    #[error("Numeric overflow for account [{account}] in period [{period}]")]
    Overflow {
        account: AccountName,
        period: Period
    },
    #[error("Threshold [{name}] must be a finite, non-negative percentage (got {value})")]
    InvalidThreshold {
        name: &'static str,
        value: f64
    }
}

impl DetectionError {
    pub fn invalid_record(row: usize, error: impl ToString) -> Self {
        Self::InvalidRecord { row, reason: error.to_string() }
    }

    pub fn no_movements(action: &'static str) -> Self {
        Self::NoMovements { action }
    }

    pub fn overflow(account: &str, period: Period) -> Self {
        Self::Overflow { account: account.to_string(), period }
    }

    /// Empty-input conditions degrade a step instead of failing the run.
    pub fn is_empty_input(&self) -> bool {
        matches!(self, Self::NoData | Self::NoMovements { .. })
    }
}
