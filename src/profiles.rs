use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::scoring::{DemandWeights, FrictionWeights, GrowthWeights, WeightConfig};

/// CBF for business types with no profile.
pub const DEFAULT_CLUSTERING_BENEFIT: f64 = 0.15;

/// How a business type reacts to neighbours and what it weighs inside each
/// sub-score. Sub-weight groups left unset fall back to the base config.
///
/// Example YAML:
/// ```yaml
/// profiles:
///   bakery:
///     clustering_benefit: 0.4
///     demand: { income: 0.25, foot_traffic: 0.45, population: 0.30 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BusinessProfile {
    pub clustering_benefit: f64,
    #[serde(default)]
    pub demand: Option<DemandWeights>,
    #[serde(default)]
    pub friction: Option<FrictionWeights>,
    #[serde(default)]
    pub growth: Option<GrowthWeights>,
}

/// What the engine needs for one business type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedProfile {
    pub clustering_benefit: f64,
    pub weights: WeightConfig,
    /// False when the business type had no profile and defaults were used
    pub known: bool,
}

fn profile(
    cbf: f64,
    demand: (f64, f64, f64),
    friction: (f64, f64, f64),
    growth: (f64, f64, f64),
) -> BusinessProfile {
    BusinessProfile {
        clustering_benefit: cbf,
        demand: Some(DemandWeights {
            income: demand.0,
            foot_traffic: demand.1,
            population: demand.2,
        }),
        friction: Some(FrictionWeights {
            competition: friction.0,
            rent: friction.1,
            accessibility: friction.2,
        }),
        growth: Some(GrowthWeights {
            trend: growth.0,
            vacancy: growth.1,
            infrastructure: growth.2,
        }),
    }
}

/// Built-in profiles keyed by lowercase business type.
pub fn builtin_profiles() -> BTreeMap<String, BusinessProfile> {
    [
        // Food & beverage: co-location draws customers
        ("restaurant", profile(0.50, (0.20, 0.50, 0.30), (0.50, 0.30, 0.20), (0.50, 0.30, 0.20))),
        ("cafe", profile(0.50, (0.20, 0.35, 0.45), (0.50, 0.30, 0.20), (0.50, 0.30, 0.20))),
        ("retail store", profile(0.30, (0.25, 0.45, 0.30), (0.45, 0.35, 0.20), (0.50, 0.30, 0.20))),
        ("supermarket", profile(0.30, (0.20, 0.40, 0.40), (0.40, 0.35, 0.25), (0.50, 0.30, 0.20))),
        ("salon & beauty", profile(0.30, (0.25, 0.45, 0.30), (0.45, 0.35, 0.20), (0.50, 0.30, 0.20))),
        ("hotel / hospitality", profile(0.20, (0.65, 0.25, 0.10), (0.15, 0.25, 0.60), (0.35, 0.25, 0.40))),
        ("souvenir / gift shop", profile(0.35, (0.50, 0.40, 0.10), (0.30, 0.30, 0.40), (0.45, 0.30, 0.25))),
        ("gym / fitness centre", profile(0.15, (0.45, 0.20, 0.35), (0.35, 0.35, 0.30), (0.45, 0.30, 0.25))),
        ("pharmacy", profile(0.15, (0.25, 0.30, 0.45), (0.35, 0.35, 0.30), (0.45, 0.30, 0.25))),
        // Professional services differentiate; neighbours are pure competition
        ("tech office", profile(0.00, (0.55, 0.15, 0.30), (0.20, 0.20, 0.60), (0.30, 0.20, 0.50))),
        ("medical clinic", profile(0.00, (0.40, 0.25, 0.35), (0.25, 0.30, 0.45), (0.35, 0.25, 0.40))),
        ("educational institute", profile(0.00, (0.45, 0.20, 0.35), (0.20, 0.25, 0.55), (0.35, 0.20, 0.45))),
    ]
    .into_iter()
    .map(|(name, p)| (name.to_string(), p))
    .collect()
}

pub fn normalize_business_type(business_type: &str) -> String {
    business_type.trim().to_lowercase()
}

/// Look up `business_type` in the built-in table overlaid with `overrides`
/// and combine it with `base` weights.
pub fn resolve(
    business_type: &str,
    overrides: &BTreeMap<String, BusinessProfile>,
    base: &WeightConfig,
) -> ResolvedProfile {
    let key = normalize_business_type(business_type);
    let found = overrides
        .iter()
        .find(|(name, _)| normalize_business_type(name) == key)
        .map(|(_, p)| p.clone())
        .or_else(|| builtin_profiles().remove(&key));

    match found {
        Some(p) => {
            let mut weights = *base;
            if let Some(demand) = p.demand {
                weights.demand = demand;
            }
            if let Some(friction) = p.friction {
                weights.friction = friction;
            }
            if let Some(growth) = p.growth {
                weights.growth = growth;
            }
            ResolvedProfile {
                clustering_benefit: p.clustering_benefit,
                weights,
                known: true,
            }
        }
        None => ResolvedProfile {
            clustering_benefit: DEFAULT_CLUSTERING_BENEFIT,
            weights: *base,
            known: false,
        },
    }
}
