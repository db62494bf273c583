use serde::Serialize;

use super::error::ValidationError;
use super::indicators::IndicatorSet;
use super::validation::WeightValidation;
use super::weights::WeightConfig;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermContribution {
    pub label: &'static str, // e.g. "Income", "Adjusted competition"
    pub weight: f64,
    pub value: f64,        // normalized input, 0-1
    pub contribution: f64, // weight * value
}

/// Unrounded intermediate values, for explaining a score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub demand: f64,
    pub friction: f64,
    pub growth: f64,
    pub location: f64,
    pub demand_terms: Vec<TermContribution>,
    pub friction_terms: Vec<TermContribution>,
    pub growth_terms: Vec<TermContribution>,
}

/// Scores for one location, on the x100 display scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub location_score: f64,
    pub demand_score: f64,
    pub friction_score: f64,
    pub growth_score: f64,
    /// CBF actually applied, after clamping
    pub clustering_benefit_factor: f64,
    /// Normalized competition after the CBF discount
    pub adjusted_competition: f64,
    pub weight_validation: WeightValidation,
    pub indicators: IndicatorSet,
    #[serde(skip)]
    pub breakdown: ScoreBreakdown,
}

/// Score one location.
///
/// Weight groups that don't sum to 1.00 don't stop scoring: the exact weights
/// are used and the imbalance is reported in `weight_validation`.
pub fn score(indicators: &IndicatorSet, weights: &WeightConfig) -> Result<ScoreResult, ValidationError> {
    indicators.validate()?;

    let w = weights.clamped();
    let n = indicators.normalized();

    let adjusted_competition = adjusted_competition(n.competition, n.clustering_benefit);

    let demand_terms = vec![
        term("Income", w.demand.income, n.income),
        term("Foot traffic", w.demand.foot_traffic, n.foot_traffic),
        term("Population density", w.demand.population, n.population),
    ];
    let friction_terms = vec![
        term("Adjusted competition", w.friction.competition, adjusted_competition),
        term("Commercial rent", w.friction.rent, n.rent),
        term("Accessibility penalty", w.friction.accessibility, n.accessibility),
    ];
    let growth_terms = vec![
        term("Area growth trend", w.growth.trend, n.trend),
        term("Vacancy improvement", w.growth.vacancy, n.vacancy),
        term("Infrastructure investment", w.growth.infrastructure, n.infrastructure),
    ];

    let demand = sum_terms(&demand_terms);
    let friction = sum_terms(&friction_terms);
    let growth = sum_terms(&growth_terms);
    let location = w.top.demand * demand - w.top.friction * friction + w.top.growth * growth;

    Ok(ScoreResult {
        name: indicators.name.clone(),
        latitude: indicators.latitude,
        longitude: indicators.longitude,
        location_score: to_display(location),
        demand_score: to_display(demand),
        friction_score: to_display(friction),
        growth_score: to_display(growth),
        clustering_benefit_factor: n.clustering_benefit,
        adjusted_competition,
        weight_validation: weights.validate(),
        indicators: indicators.clone(),
        breakdown: ScoreBreakdown {
            demand,
            friction,
            growth,
            location,
            demand_terms,
            friction_terms,
            growth_terms,
        },
    })
}

/// [`score`] with [`WeightConfig::DEFAULT`].
pub fn score_default(indicators: &IndicatorSet) -> Result<ScoreResult, ValidationError> {
    score(indicators, &WeightConfig::DEFAULT)
}

/// Score a batch under one shared weight snapshot. Stops at the first invalid
/// location.
pub fn score_all<'a, I>(locations: I, weights: &WeightConfig) -> Result<Vec<ScoreResult>, ValidationError>
where
    I: IntoIterator<Item = &'a IndicatorSet>,
{
    locations
        .into_iter()
        .map(|indicators| score(indicators, weights))
        .collect()
}

/// Competition after the co-location discount. Both inputs are expected
/// normalized; `cbf` in [0, 0.5].
pub fn adjusted_competition(competition: f64, cbf: f64) -> f64 {
    competition * (1.0 - cbf)
}

/// Scale a 0-1 value to the x100 display scale, one decimal, half-up.
pub fn to_display(value: f64) -> f64 {
    round_half_up_1dp(value * 100.0)
}

pub fn round_half_up_1dp(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

fn term(label: &'static str, weight: f64, value: f64) -> TermContribution {
    TermContribution {
        label,
        weight,
        value,
        contribution: weight * value,
    }
}

fn sum_terms(terms: &[TermContribution]) -> f64 {
    terms.iter().map(|t| t.contribution).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::indicators::tests::sample_indicators;
    use crate::scoring::normalize::IndicatorScale;
    use crate::scoring::weights::TopWeights;

    fn unit_sample() -> IndicatorSet {
        IndicatorSet {
            income_index: 0.65,
            foot_traffic_index: 0.60,
            population_density_index: 0.55,
            competition_index: 0.50,
            commercial_rent_index: 0.45,
            accessibility_penalty: 0.25,
            clustering_benefit_factor: 0.15,
            area_growth_trend: 0.50,
            vacancy_rate_improvement: 0.45,
            infrastructure_investment_index: 0.50,
            scale: IndicatorScale::Unit,
            ..sample_indicators("Kasba")
        }
    }

    #[test]
    fn test_reference_scenario() {
        let result = score_default(&unit_sample()).unwrap();

        assert!((result.adjusted_competition - 0.425).abs() < 1e-12);
        assert!((result.breakdown.demand - 0.5975).abs() < 1e-12);
        assert!((result.breakdown.friction - 0.39).abs() < 1e-12);
        assert!((result.breakdown.growth - 0.485).abs() < 1e-12);
        assert!((result.breakdown.location - 0.22375).abs() < 1e-12);
        assert_eq!(result.location_score, 22.4);
        assert_eq!(result.growth_score, 48.5);
        assert!(result.weight_validation.all_valid());
    }

    #[test]
    fn test_percent_scale_matches_unit_scale() {
        let percent = score_default(&sample_indicators("Kasba")).unwrap();
        let unit = score_default(&unit_sample()).unwrap();
        assert_eq!(percent.location_score, unit.location_score);
        assert!((percent.breakdown.location - unit.breakdown.location).abs() < 1e-12);
    }

    #[test]
    fn test_deterministic() {
        let set = sample_indicators("Kasba");
        let weights = WeightConfig::DEFAULT;
        let a = score(&set, &weights).unwrap();
        let b = score(&set, &weights).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.breakdown.location.to_bits(), b.breakdown.location.to_bits());
    }

    #[test]
    fn test_identity_carried_through() {
        let set = sample_indicators("Kasba");
        let result = score_default(&set).unwrap();
        assert_eq!(result.name, "Kasba");
        assert_eq!(result.latitude, set.latitude);
        assert_eq!(result.longitude, set.longitude);
        assert_eq!(result.indicators, set);
    }

    #[test]
    fn test_cbf_strictly_decreases_adjusted_competition() {
        let mut previous = f64::INFINITY;
        for step in 0..=10 {
            let cbf = step as f64 * 0.05;
            let adj = adjusted_competition(0.7, cbf);
            assert!(adj < previous, "cbf {} gave {} (previous {})", cbf, adj, previous);
            previous = adj;
        }
    }

    #[test]
    fn test_higher_cbf_never_lowers_score() {
        let low = score_default(&sample_indicators("A").with_clustering_benefit(0.0)).unwrap();
        let high = score_default(&sample_indicators("A").with_clustering_benefit(0.5)).unwrap();
        assert!(high.breakdown.location > low.breakdown.location);
        assert!(high.breakdown.friction < low.breakdown.friction);
    }

    #[test]
    fn test_imbalanced_top_weights_still_score_with_exact_values() {
        let mut weights = WeightConfig::DEFAULT;
        weights.top = TopWeights {
            demand: 0.5,
            friction: 0.3,
            growth: 0.3,
        };
        let result = score(&unit_sample(), &weights).unwrap();

        assert!(!result.weight_validation.top);
        assert!(result.weight_validation.demand);
        assert!(result.weight_validation.friction);
        assert!(result.weight_validation.growth);

        let expected = 0.5 * 0.5975 - 0.3 * 0.39 + 0.3 * 0.485;
        assert!((result.breakdown.location - expected).abs() < 1e-12);
        assert_eq!(result.location_score, to_display(expected));
    }

    #[test]
    fn test_out_of_range_top_weight_scores_clamped_and_flags_group() {
        let mut weights = WeightConfig::DEFAULT;
        weights.top = TopWeights {
            demand: 1.2,
            friction: 0.0,
            growth: 0.0,
        };
        let result = score(&unit_sample(), &weights).unwrap();
        assert!(!result.weight_validation.top);
        assert!((result.breakdown.location - 0.5975).abs() < 1e-12);
        assert_eq!(result.location_score, to_display(result.breakdown.location));
    }

    #[test]
    fn test_nan_input_fails_with_field() {
        let mut set = sample_indicators("Kasba");
        set.commercial_rent_index = f64::NAN;
        let err = score_default(&set).unwrap_err();
        assert_eq!(err.field(), "commercial_rent_index");
    }

    #[test]
    fn test_out_of_range_clamped_not_rejected() {
        let mut set = sample_indicators("Kasba");
        set.income_index = 250.0;
        let clamped = score_default(&set).unwrap();
        set.income_index = 100.0;
        let at_max = score_default(&set).unwrap();
        assert_eq!(clamped.location_score, at_max.location_score);
    }

    #[test]
    fn test_engine_does_not_mutate_inputs() {
        let set = sample_indicators("Kasba");
        let weights = WeightConfig::DEFAULT;
        let before = (set.clone(), weights);
        let _ = score(&set, &weights).unwrap();
        assert_eq!((set, weights), before);
    }

    #[test]
    fn test_score_range_with_default_weights() {
        let mut best = unit_sample();
        best.income_index = 1.0;
        best.foot_traffic_index = 1.0;
        best.population_density_index = 1.0;
        best.competition_index = 0.0;
        best.commercial_rent_index = 0.0;
        best.accessibility_penalty = 0.0;
        best.area_growth_trend = 1.0;
        best.vacancy_rate_improvement = 1.0;
        best.infrastructure_investment_index = 1.0;
        assert_eq!(score_default(&best).unwrap().location_score, 65.0);

        let mut worst = best.clone();
        worst.income_index = 0.0;
        worst.foot_traffic_index = 0.0;
        worst.population_density_index = 0.0;
        worst.competition_index = 1.0;
        worst.commercial_rent_index = 1.0;
        worst.accessibility_penalty = 1.0;
        worst.clustering_benefit_factor = 0.0;
        worst.area_growth_trend = 0.0;
        worst.vacancy_rate_improvement = 0.0;
        worst.infrastructure_investment_index = 0.0;
        assert_eq!(score_default(&worst).unwrap().location_score, -35.0);
    }

    #[test]
    fn test_breakdown_terms_sum_to_subscores() {
        let result = score_default(&sample_indicators("Kasba")).unwrap();
        let b = &result.breakdown;
        assert_eq!(b.demand_terms.len(), 3);
        assert_eq!(b.friction_terms[0].label, "Adjusted competition");
        let friction: f64 = b.friction_terms.iter().map(|t| t.contribution).sum();
        assert_eq!(friction, b.friction);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up_1dp(20.3875), 20.4);
        assert_eq!(round_half_up_1dp(20.25), 20.3);
        assert_eq!(round_half_up_1dp(-20.25), -20.2);
        assert_eq!(round_half_up_1dp(0.0), 0.0);
    }

    #[test]
    fn test_score_all_propagates_first_error() {
        let good = sample_indicators("A");
        let mut bad = sample_indicators("B");
        bad.area_growth_trend = f64::NAN;
        let err = score_all([&good, &bad], &WeightConfig::DEFAULT).unwrap_err();
        assert!(err.to_string().contains("B"));

        let ok = score_all([&good, &good], &WeightConfig::DEFAULT).unwrap();
        assert_eq!(ok.len(), 2);
    }
}
