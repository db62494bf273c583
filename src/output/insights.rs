use crate::scoring::{normalize, ScoreResult};

/// Low / Moderate / High bucket for a 0-100 index.
fn threshold_label(value: f64, low: f64, high: f64) -> &'static str {
    if value >= high {
        "High"
    } else if value >= low {
        "Moderate"
    } else {
        "Low"
    }
}

/// Three plain-language bullets explaining a location's sub-scores:
/// demand signal, competitive landscape, growth outlook.
pub fn generate_insights(result: &ScoreResult, business_type: &str) -> Vec<String> {
    let ind = &result.indicators;
    // Thresholds are on the 0-100 scale whatever the input scale was
    let pct = |v: f64| (normalize(v, ind.scale) * 100.0).round();

    let income = pct(ind.income_index);
    let traffic = pct(ind.foot_traffic_index);
    let competition = pct(ind.competition_index);
    let rent = pct(ind.commercial_rent_index);
    let access = pct(ind.accessibility_penalty);
    let trend = pct(ind.area_growth_trend);
    let infra = pct(ind.infrastructure_investment_index);

    let demand = result.breakdown.demand;
    let growth = result.breakdown.growth;

    let rent_lbl = threshold_label(rent, 40.0, 65.0).to_lowercase();
    let mut bullets = Vec::with_capacity(3);

    let strength = if demand > 0.65 {
        "strong"
    } else if demand > 0.45 {
        "moderate"
    } else {
        "limited"
    };
    bullets.push(format!(
        "{} consumer income ({}/100) with {} foot traffic ({}/100): Demand Score {:.1}/100 signals {} demand potential for a {}.",
        threshold_label(income, 55.0, 75.0),
        income,
        threshold_label(traffic, 55.0, 75.0).to_lowercase(),
        traffic,
        result.demand_score,
        strength,
        business_type
    ));

    if competition >= 70.0 {
        bullets.push(format!(
            "High market saturation ({}/100) drives Friction Score {:.1}/100, so differentiation is essential. Accessibility is {} and rent is {}.",
            competition,
            result.friction_score,
            threshold_label(access, 30.0, 55.0).to_lowercase(),
            rent_lbl
        ));
    } else if competition >= 45.0 {
        bullets.push(format!(
            "Moderate competition ({}/100) with {} rent: Friction Score {:.1}/100 leaves room for a well-marketed {} to build a loyal base.",
            competition, rent_lbl, result.friction_score, business_type
        ));
    } else {
        bullets.push(format!(
            "Low competition ({}/100) and {} rent yield Friction Score {:.1}/100, a first-mover opening.",
            competition, rent_lbl, result.friction_score
        ));
    }

    let outlook = if growth > 0.60 {
        "rapidly evolving"
    } else if growth > 0.40 {
        "steadily developing"
    } else {
        "relatively mature"
    };
    bullets.push(format!(
        "{} growth trend ({}/100) with infrastructure index {}/100: Growth Score {:.1}/100 indicates this area is {}.",
        threshold_label(trend, 45.0, 65.0),
        trend,
        infra,
        result.growth_score,
        outlook
    ));

    bullets
}
