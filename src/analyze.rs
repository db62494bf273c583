use tracing::{debug, warn};

use crate::config::{BudgetConfig, Config};
use crate::profiles::{self, ResolvedProfile};
use crate::ranking::{rank, summarize, RankedResult, RankingSummary};
use crate::scoring::{normalize, score_all, IndicatorSet, ValidationError, WeightConfig};

/// Caller choices for one analysis run.
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// Resolved against the profile table; `None` uses base weights and the
    /// default clustering benefit
    pub business_type: Option<String>,
    /// Monthly rent budget; `None` disables the budget filter
    pub budget: Option<f64>,
    /// Locations kept after ranking; `None` keeps the configured default
    pub top: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub ranked: Vec<RankedResult>,
    /// Reductions over `ranked` (after the top-N cut)
    pub summary: RankingSummary,
    pub profile: ResolvedProfile,
    pub total_locations: usize,
    pub excluded_by_budget: usize,
}

/// Estimated monthly rent for a location.
pub fn estimated_rent(location: &IndicatorSet, budget: &BudgetConfig) -> f64 {
    normalize(location.commercial_rent_index, location.scale) * budget.rent_ceiling
}

/// Whether a location's estimated rent fits `monthly_budget` with tolerance.
pub fn within_budget(location: &IndicatorSet, monthly_budget: f64, budget: &BudgetConfig) -> bool {
    estimated_rent(location, budget) <= monthly_budget * budget.tolerance
}

/// Resolve the business profile from the config, or base weights when no
/// business type was given.
pub fn resolve_profile(business_type: Option<&str>, config: &Config) -> ResolvedProfile {
    let base = config.effective_weights();
    match business_type {
        Some(bt) => profiles::resolve(bt, &config.profiles, &base),
        None => ResolvedProfile {
            clustering_benefit: profiles::DEFAULT_CLUSTERING_BENEFIT,
            weights: base,
            known: false,
        },
    }
}

/// Filter, score and rank `locations`.
///
/// Every location shares one weight snapshot and one clustering benefit.
pub fn analyze(
    locations: Vec<IndicatorSet>,
    options: &AnalysisOptions,
    config: &Config,
) -> Result<Analysis, ValidationError> {
    let total_locations = locations.len();
    let profile = resolve_profile(options.business_type.as_deref(), config);

    if let Some(bt) = options.business_type.as_deref() {
        if profile.known {
            debug!(business_type = bt, cbf = profile.clustering_benefit, "resolved business profile");
        } else {
            warn!(
                business_type = bt,
                cbf = profile.clustering_benefit,
                "unknown business type, using default weights"
            );
        }
    }
    log_weight_imbalances(&profile.weights);

    // A NaN rent would otherwise just fail the budget comparison
    for loc in &locations {
        loc.validate()?;
    }

    let budget_config = config.effective_budget();
    let candidates: Vec<IndicatorSet> = locations
        .into_iter()
        .filter(|loc| match options.budget {
            Some(b) => {
                let keep = within_budget(loc, b, &budget_config);
                if !keep {
                    debug!(
                        location = %loc.name,
                        estimated_rent = estimated_rent(loc, &budget_config),
                        "excluded by budget"
                    );
                }
                keep
            }
            None => true,
        })
        .map(|loc| loc.with_clustering_benefit(profile.clustering_benefit))
        .collect();
    let excluded_by_budget = total_locations - candidates.len();

    for loc in &candidates {
        let clamped = loc.clamped_fields();
        if !clamped.is_empty() {
            warn!(location = %loc.name, fields = ?clamped, "values outside declared range were clamped");
        }
    }

    let scored = score_all(&candidates, &profile.weights)?;
    let mut ranked = rank(scored);
    ranked.truncate(options.top.unwrap_or_else(|| config.effective_top()));
    let summary = summarize(&ranked);

    debug!(
        total = total_locations,
        excluded = excluded_by_budget,
        shown = ranked.len(),
        "analysis complete"
    );

    Ok(Analysis {
        ranked,
        summary,
        profile,
        total_locations,
        excluded_by_budget,
    })
}

fn log_weight_imbalances(weights: &WeightConfig) {
    for imbalance in weights.imbalances() {
        warn!(
            group = imbalance.group,
            sum = imbalance.sum,
            "weight group does not sum to 1.00; scores are flagged"
        );
    }
}
