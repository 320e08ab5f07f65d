use std::fmt;
use std::fmt::{Display, Formatter};

use rust_decimal::Decimal;

use crate::types::{AccountName, Period};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum MovementType {
    MoM,
    YoY
}

impl Display for MovementType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MovementType::MoM => write!(formatter, "MoM"),
            MovementType::YoY => write!(formatter, "YoY")
        }
    }
}

/// Tier derived from how many multiples of the threshold a change represents.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Significance {
    Low,
    Medium,
    High,
    Critical
}

impl Display for Significance {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            Significance::Low => "Low",
            Significance::Medium => "Medium",
            Significance::High => "High",
            Significance::Critical => "Critical"
        };

        write!(formatter, "{label}")
    }
}

/// Change in an account's monthly total between two compared periods.
#[derive(Debug, Clone, PartialEq)]
pub struct Movement {
    pub account: AccountName,
    pub movement_type: MovementType,
    pub current_period: Period,
    pub current_amount: Decimal,
    pub previous_period: Period,
    pub previous_amount: Decimal,
    /// Change relative to `|previous_amount|`, in percent. Always finite.
    pub percentage_change: f64,
    pub absolute_change: Decimal
}

/// A movement that cleared its type's threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedMovement {
    pub movement: Movement,
    pub significance: Significance,
    /// `|absolute_change|` scaled against the largest retained change, 0..=100.
    pub abs_score: f64,
    pub materiality_score: f64
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedMovement {
    /// 1-based position by descending materiality.
    pub rank: usize,
    pub classified: ClassifiedMovement
}

impl RankedMovement {
    pub fn movement(&self) -> &Movement {
        &self.classified.movement
    }
}
