pub mod summary;

pub use summary::{summarize, CheapestLocation, RankingSummary, TopLocation};

use serde::Serialize;
use std::cmp::Ordering;

use crate::scoring::ScoreResult;

/// A score with its 1-based position in the ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub rank: usize,
    #[serde(flatten)]
    pub result: ScoreResult,
}

/// Order results by location score, best first, and number them 1..N.
///
/// Equal scores keep their input order; the input position is part of the
/// sort key so this holds regardless of the sort's own stability. Ranks are
/// positional: tied locations get consecutive ranks, never a shared one.
pub fn rank(results: Vec<ScoreResult>) -> Vec<RankedResult> {
    let mut indexed: Vec<(usize, ScoreResult)> = results.into_iter().enumerate().collect();

    indexed.sort_by(|(ia, a), (ib, b)| {
        // Primary: score descending
        let score_cmp = b.location_score.total_cmp(&a.location_score);
        if score_cmp != Ordering::Equal {
            return score_cmp;
        }
        // Tie-breaker: earlier input first
        ia.cmp(ib)
    });

    indexed
        .into_iter()
        .enumerate()
        .map(|(position, (_, result))| RankedResult {
            rank: position + 1,
            result,
        })
        .collect()
}
