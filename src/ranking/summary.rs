use serde::Serialize;

use super::RankedResult;
use crate::scoring::engine::round_half_up_1dp;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopLocation {
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheapestLocation {
    pub name: String,
    pub commercial_rent_index: f64,
}

/// Read-only reductions over a ranked list. Every field is `None` when the
/// list is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankingSummary {
    pub top: Option<TopLocation>,
    pub average_score: Option<f64>,
    pub cheapest: Option<CheapestLocation>,
}

pub fn summarize(ranked: &[RankedResult]) -> RankingSummary {
    if ranked.is_empty() {
        return RankingSummary::default();
    }

    let top = ranked
        .iter()
        .max_by(|a, b| {
            a.result
                .location_score
                .total_cmp(&b.result.location_score)
                // max_by keeps the last maximum; prefer the better rank
                .then(b.rank.cmp(&a.rank))
        })
        .map(|r| TopLocation {
            name: r.result.name.clone(),
            score: r.result.location_score,
        });

    let total: f64 = ranked.iter().map(|r| r.result.location_score).sum();
    let average_score = Some(round_half_up_1dp(total / ranked.len() as f64));

    // First minimum in ranked order wins ties
    let cheapest = ranked
        .iter()
        .fold(None::<&RankedResult>, |best, r| match best {
            Some(b) if b.result.indicators.commercial_rent_index
                <= r.result.indicators.commercial_rent_index =>
            {
                Some(b)
            }
            _ => Some(r),
        })
        .map(|r| CheapestLocation {
            name: r.result.name.clone(),
            commercial_rent_index: r.result.indicators.commercial_rent_index,
        });

    RankingSummary {
        top,
        average_score,
        cheapest,
    }
}
