use tracing::debug;

use crate::models::{ClassifiedMovement, DetectionError, RankedMovement, Significance};

/// Materiality metrics of a ranked set.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingStats {
    pub total_movements: usize,
    pub top_movement_score: f64,
    pub avg_materiality_score: f64,
    pub critical_movements: usize,
    pub high_movements: usize,
    pub medium_movements: usize
}

/// Orders movements by descending materiality and assigns 1-based ranks.
///
/// The sort is stable, so equal scores keep their input order.
///
/// # Errors
/// Returns `NoMovements` when `movements` is empty.
pub fn rank_movements_by_significance(movements: &[ClassifiedMovement]) -> Result<(Vec<RankedMovement>, RankingStats), DetectionError> {
    if movements.is_empty() {
        return Err(DetectionError::no_movements("rank"));
    }

    let mut ordered = movements.to_vec();
    ordered.sort_by(|left, right| right.materiality_score.total_cmp(&left.materiality_score));

    let ranked: Vec<RankedMovement> = ordered.into_iter()
        .enumerate()
        .map(|(index, classified)| RankedMovement { rank: index + 1, classified })
        .collect();

    let count = |significance: Significance| ranked.iter()
        .filter(|movement| movement.classified.significance == significance)
        .count();

    let stats = RankingStats {
        total_movements: ranked.len(),
        top_movement_score: ranked[0].classified.materiality_score,
        avg_materiality_score: ranked.iter().map(|movement| movement.classified.materiality_score).sum::<f64>() / ranked.len() as f64,
        critical_movements: count(Significance::Critical),
        high_movements: count(Significance::High),
        medium_movements: count(Significance::Medium)
    };

    debug!("Ranked {} movements, top score {:.2}", stats.total_movements, stats.top_movement_score);

    Ok((ranked, stats))
}
