use rust_decimal::Decimal;

use crate::engine::DetectionResult;
use crate::models::{AccountFlag, Movement, MovementType, RankedMovement, Significance};
use crate::types::AccountName;

/// The movement record handed to the commentary collaborator as prompt context.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentaryInput {
    pub account: AccountName,
    pub movement_type: MovementType,
    pub significance: Significance,
    pub percentage_change: f64,
    pub absolute_change: Decimal,
    pub current_amount: Decimal,
    pub previous_amount: Decimal
}

impl From<&RankedMovement> for CommentaryInput {
    fn from(ranked: &RankedMovement) -> Self {
        let movement = ranked.movement();

        Self {
            account: movement.account.clone(),
            movement_type: movement.movement_type,
            significance: ranked.classified.significance,
            percentage_change: movement.percentage_change,
            absolute_change: movement.absolute_change,
            current_amount: movement.current_amount,
            previous_amount: movement.previous_amount
        }
    }
}

/// History of one account across the whole run.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountContext<'a> {
    pub flag: Option<&'a AccountFlag>,
    pub mom_movements: usize,
    pub yoy_movements: usize,
    pub accounts_processed: usize,
    pub periods_processed: usize
}

impl DetectionResult {
    pub fn account_context(&self, account: &str) -> AccountContext<'_> {
        let count_for = |movements: Option<&[Movement]>| movements
            .unwrap_or_default()
            .iter()
            .filter(|movement| movement.account == account)
            .count();

        let coverage = self.per_step_stats().monthly_summary.stats();

        AccountContext {
            flag: self.account_flags().iter().find(|flag| flag.account == account),
            mom_movements: count_for(self.mom_movements()),
            yoy_movements: count_for(self.yoy_movements()),
            accounts_processed: coverage.map_or(0, |stats| stats.accounts_processed),
            periods_processed: coverage.map_or(0, |stats| stats.periods_processed)
        }
    }

    /// Commentary inputs for the `count` most material movements.
    pub fn commentary_inputs(&self, count: usize) -> Vec<CommentaryInput> {
        self.top_movements(count).iter().map(CommentaryInput::from).collect()
    }
}
