use std::collections::HashSet;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

use crate::analysis::aggregation::group_by_account;
use crate::models::{DetectionError, MonthlyAggregate, Movement, MovementType};

#[derive(Debug, Clone, PartialEq)]
pub struct MovementStats {
    pub total_movements: usize,
    pub accounts_analyzed: usize
}

/// Percentage change of `current` against `|previous|`.
///
/// A zero baseline yields +100, -100 or 0 following the sign of `current`.
/// Returns `None` only if the decimal arithmetic overflows.
pub fn percentage_change(current: Decimal, previous: Decimal) -> Option<f64> {
    if previous.is_zero() {
        let signed = if current > Decimal::ZERO {
            100.0
        } else if current < Decimal::ZERO {
            -100.0
        } else {
            0.0
        };

        return Some(signed);
    }

    current.checked_sub(previous)?
        .checked_div(previous.abs())?
        .checked_mul(Decimal::ONE_HUNDRED)?
        .to_f64()
}

/// Month-over-month movements between each account's consecutive observed periods.
///
/// Missing months are not padded: an account seen in January and March
/// compares March against January.
pub fn calculate_mom_movements(aggregates: &[MonthlyAggregate]) -> Result<(Vec<Movement>, MovementStats), DetectionError> {
    let mut movements = Vec::new();

    for rows in group_by_account(aggregates).values() {
        for pair in rows.windows(2) {
            movements.push(build_movement(MovementType::MoM, pair[1], pair[0])?);
        }
    }

    let stats = movement_stats(&movements);
    debug!("Calculated {} MoM movements across {} accounts", stats.total_movements, stats.accounts_analyzed);

    Ok((movements, stats))
}

/// Year-over-year movements between the same calendar month of consecutive years.
///
/// A missing year breaks the chain for that month; January 2022 is never
/// compared with January 2024.
pub fn calculate_yoy_movements(aggregates: &[MonthlyAggregate]) -> Result<(Vec<Movement>, MovementStats), DetectionError> {
    let mut movements = Vec::new();

    for rows in group_by_account(aggregates).values() {
        for month in 1..=12 {
            let same_month: Vec<&MonthlyAggregate> = rows.iter()
                .copied()
                .filter(|row| row.month() == month)
                .collect();

            for pair in same_month.windows(2) {
                if pair[1].period.is_year_after(&pair[0].period) {
                    movements.push(build_movement(MovementType::YoY, pair[1], pair[0])?);
                }
            }
        }
    }

    let stats = movement_stats(&movements);
    debug!("Calculated {} YoY movements across {} accounts", stats.total_movements, stats.accounts_analyzed);

    Ok((movements, stats))
}

fn build_movement(movement_type: MovementType, current: &MonthlyAggregate, previous: &MonthlyAggregate) -> Result<Movement, DetectionError> {
    let overflow = || DetectionError::overflow(&current.account, current.period);

    let percentage_change = percentage_change(current.amount, previous.amount).ok_or_else(overflow)?;
    let absolute_change = current.amount.checked_sub(previous.amount).ok_or_else(overflow)?;

    Ok(Movement {
        account: current.account.clone(),
        movement_type,
        current_period: current.period,
        current_amount: current.amount,
        previous_period: previous.period,
        previous_amount: previous.amount,
        percentage_change,
        absolute_change
    })
}

fn movement_stats(movements: &[Movement]) -> MovementStats {
    MovementStats {
        total_movements: movements.len(),
        accounts_analyzed: movements.iter().map(|movement| movement.account.as_str()).collect::<HashSet<_>>().len()
    }
}
