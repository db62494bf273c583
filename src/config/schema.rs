use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::profiles::BusinessProfile;
use crate::scoring::WeightConfig;

/// Default number of locations kept after ranking.
pub const DEFAULT_TOP: usize = 5;

/// Top-level configuration file.
///
/// Example YAML:
/// ```yaml
/// weights:
///   top: { demand: 0.40, friction: 0.35, growth: 0.25 }
/// profiles:
///   bakery: { clustering_benefit: 0.4 }
/// budget:
///   rent_ceiling: 300000
///   tolerance: 1.5
/// top: 5
/// dataset: ~/data/kolkata.yaml
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<WeightConfig>,

    /// Business types added to or replacing the built-in profiles
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub profiles: BTreeMap<String, BusinessProfile>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<BudgetConfig>,

    /// Locations kept after ranking (default: 5)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<usize>,

    /// Dataset used when `--dataset` isn't given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<PathBuf>,
}

impl Config {
    pub fn effective_weights(&self) -> WeightConfig {
        self.weights.unwrap_or_default()
    }

    pub fn effective_budget(&self) -> BudgetConfig {
        self.budget.unwrap_or_default()
    }

    pub fn effective_top(&self) -> usize {
        self.top.unwrap_or(DEFAULT_TOP)
    }
}

/// Maps the rent index to a monthly rent estimate for the budget filter.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BudgetConfig {
    /// Monthly rent at rent index 100
    #[serde(default = "default_rent_ceiling")]
    pub rent_ceiling: f64,

    /// Multiplier on the stated budget before a location is excluded
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_rent_ceiling() -> f64 {
    300_000.0
}

fn default_tolerance() -> f64 {
    1.5
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            rent_ceiling: default_rent_ceiling(),
            tolerance: default_tolerance(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_parse() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.effective_top(), 5);
        assert_eq!(config.effective_weights(), WeightConfig::DEFAULT);
        assert_eq!(config.effective_budget().rent_ceiling, 300_000.0);
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
weights:
  top:
    demand: 0.5
    friction: 0.3
    growth: 0.2
profiles:
  bakery:
    clustering_benefit: 0.4
budget:
  tolerance: 1.2
top: 10
dataset: /tmp/areas.csv
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.effective_weights().top.demand, 0.5);
        assert_eq!(config.profiles["bakery"].clustering_benefit, 0.4);
        let budget = config.effective_budget();
        assert_eq!(budget.tolerance, 1.2);
        assert_eq!(budget.rent_ceiling, 300_000.0);
        assert_eq!(config.effective_top(), 10);
        assert_eq!(config.dataset, Some(PathBuf::from("/tmp/areas.csv")));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(serde_saphyr::from_str::<Config>("queries: []").is_err());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config {
            weights: Some(WeightConfig::DEFAULT),
            top: Some(3),
            ..Config::default()
        };
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }
}
