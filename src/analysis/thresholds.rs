use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

use crate::engine::DetectionConfig;
use crate::models::{ClassifiedMovement, DetectionError, Movement, Significance};

/// Weight of `|percentage_change|` in the materiality score.
pub const PERCENTAGE_WEIGHT: f64 = 0.6;
/// Weight of the normalized absolute change in the materiality score.
pub const ABSOLUTE_WEIGHT: f64 = 0.4;

#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdStats {
    pub total_movements_analyzed: usize,
    pub significant_movements_found: usize,
    pub mom_threshold_applied: f64,
    pub yoy_threshold_applied: f64
}

pub fn classify_significance(percentage_change: f64, threshold: f64) -> Significance {
    let magnitude = percentage_change.abs();

    if magnitude >= threshold * 3.0 {
        Significance::Critical
    } else if magnitude >= threshold * 2.0 {
        Significance::High
    } else if magnitude >= threshold {
        Significance::Medium
    } else {
        Significance::Low
    }
}

/// Keeps the movements that reach their type's threshold and scores them.
///
/// Movements below the threshold (the `Low` tier) are dropped. The absolute
/// score is normalized against the largest change among the retained
/// movements only.
///
/// # Errors
/// - `InvalidThreshold` when either threshold is negative or not finite.
/// - `NoMovements` when `movements` is empty.
pub fn apply_movement_thresholds(movements: &[Movement], config: &DetectionConfig) -> Result<(Vec<ClassifiedMovement>, ThresholdStats), DetectionError> {
    config.validate()?;

    if movements.is_empty() {
        return Err(DetectionError::no_movements("analyze"));
    }

    let retained: Vec<(&Movement, Significance)> = movements.iter()
        .filter_map(|movement| {
            let threshold = config.threshold_for(movement.movement_type);

            (movement.percentage_change.abs() >= threshold)
                .then(|| (movement, classify_significance(movement.percentage_change, threshold)))
        })
        .collect();

    let max_abs_change = retained.iter()
        .map(|(movement, _)| movement.absolute_change.abs())
        .max()
        .unwrap_or(Decimal::ZERO);

    let significant: Vec<ClassifiedMovement> = retained.into_iter()
        .map(|(movement, significance)| {
            let abs_score = abs_score(movement.absolute_change, max_abs_change);

            ClassifiedMovement {
                movement: movement.clone(),
                significance,
                abs_score,
                materiality_score: movement.percentage_change.abs() * PERCENTAGE_WEIGHT + abs_score * ABSOLUTE_WEIGHT
            }
        })
        .collect();

    debug!("{} of {} movements cleared their thresholds", significant.len(), movements.len());

    let stats = ThresholdStats {
        total_movements_analyzed: movements.len(),
        significant_movements_found: significant.len(),
        mom_threshold_applied: config.mom_threshold,
        yoy_threshold_applied: config.yoy_threshold
    };

    Ok((significant, stats))
}

fn abs_score(absolute_change: Decimal, max_abs_change: Decimal) -> f64 {
    if max_abs_change.is_zero() {
        return 0.0;
    }

    absolute_change.abs()
        .checked_div(max_abs_change)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|score| score.to_f64())
        .unwrap_or(0.0)
}
