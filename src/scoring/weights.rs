use serde::{Deserialize, Serialize};

use super::validation::{sums_to_one, WeightValidation};

/// Top-level split between the three sub-scores.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TopWeights {
    pub demand: f64,
    pub friction: f64,
    pub growth: f64,
}

/// Weights inside the demand sub-score.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DemandWeights {
    pub income: f64,
    pub foot_traffic: f64,
    pub population: f64,
}

/// Weights inside the friction sub-score.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FrictionWeights {
    pub competition: f64,
    pub rent: f64,
    pub accessibility: f64,
}

/// Weights inside the growth sub-score.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GrowthWeights {
    pub trend: f64,
    pub vacancy: f64,
    pub infrastructure: f64,
}

/// Formula coefficients, grouped the way the formula uses them.
///
/// Every group is expected to sum to 1.00 at two-decimal granularity. A group
/// that doesn't is still usable: the engine scores with the exact values and
/// reports the imbalance alongside the result.
///
/// Example YAML:
/// ```yaml
/// weights:
///   top: { demand: 0.40, friction: 0.35, growth: 0.25 }
///   friction: { competition: 0.50, rent: 0.30, accessibility: 0.20 }
/// ```
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WeightConfig {
    #[serde(default = "default_top")]
    pub top: TopWeights,
    #[serde(default = "default_demand")]
    pub demand: DemandWeights,
    #[serde(default = "default_friction")]
    pub friction: FrictionWeights,
    #[serde(default = "default_growth")]
    pub growth: GrowthWeights,
}

fn default_top() -> TopWeights {
    WeightConfig::DEFAULT.top
}

fn default_demand() -> DemandWeights {
    WeightConfig::DEFAULT.demand
}

fn default_friction() -> FrictionWeights {
    WeightConfig::DEFAULT.friction
}

fn default_growth() -> GrowthWeights {
    WeightConfig::DEFAULT.growth
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// One weight group that fails the sum check.
#[derive(Debug, Clone, PartialEq)]
pub struct Imbalance {
    pub group: &'static str,
    pub sum: f64,
}

impl WeightConfig {
    pub const DEFAULT: WeightConfig = WeightConfig {
        top: TopWeights {
            demand: 0.40,
            friction: 0.35,
            growth: 0.25,
        },
        demand: DemandWeights {
            income: 0.30,
            foot_traffic: 0.35,
            population: 0.35,
        },
        friction: FrictionWeights {
            competition: 0.40,
            rent: 0.35,
            accessibility: 0.25,
        },
        growth: GrowthWeights {
            trend: 0.50,
            vacancy: 0.30,
            infrastructure: 0.20,
        },
    };

    /// Copy with every weight clamped into [0,1].
    pub fn clamped(&self) -> WeightConfig {
        let c = |w: f64| w.clamp(0.0, 1.0);
        WeightConfig {
            top: TopWeights {
                demand: c(self.top.demand),
                friction: c(self.top.friction),
                growth: c(self.top.growth),
            },
            demand: DemandWeights {
                income: c(self.demand.income),
                foot_traffic: c(self.demand.foot_traffic),
                population: c(self.demand.population),
            },
            friction: FrictionWeights {
                competition: c(self.friction.competition),
                rent: c(self.friction.rent),
                accessibility: c(self.friction.accessibility),
            },
            growth: GrowthWeights {
                trend: c(self.growth.trend),
                vacancy: c(self.growth.vacancy),
                infrastructure: c(self.growth.infrastructure),
            },
        }
    }

    /// Sums of each group, in (top, demand, friction, growth) order.
    pub fn group_sums(&self) -> [(&'static str, f64); 4] {
        [
            ("top", self.top.demand + self.top.friction + self.top.growth),
            (
                "demand",
                self.demand.income + self.demand.foot_traffic + self.demand.population,
            ),
            (
                "friction",
                self.friction.competition + self.friction.rent + self.friction.accessibility,
            ),
            (
                "growth",
                self.growth.trend + self.growth.vacancy + self.growth.infrastructure,
            ),
        ]
    }

    /// Per-group sum check on the weights as supplied. Out-of-range weights
    /// are clamped for scoring but still count here, so they show up as an
    /// imbalance.
    pub fn validate(&self) -> WeightValidation {
        let [(_, top), (_, demand), (_, friction), (_, growth)] = self.group_sums();
        WeightValidation {
            top: sums_to_one(top),
            demand: sums_to_one(demand),
            friction: sums_to_one(friction),
            growth: sums_to_one(growth),
        }
    }

    /// Groups failing the sum check, with their sums.
    pub fn imbalances(&self) -> Vec<Imbalance> {
        self.group_sums()
            .into_iter()
            .filter(|(_, sum)| !sums_to_one(*sum))
            .map(|(group, sum)| Imbalance { group, sum })
            .collect()
    }

    /// Every individual weight with its dotted path, for range checks.
    pub fn entries(&self) -> [(&'static str, f64); 12] {
        [
            ("top.demand", self.top.demand),
            ("top.friction", self.top.friction),
            ("top.growth", self.top.growth),
            ("demand.income", self.demand.income),
            ("demand.foot_traffic", self.demand.foot_traffic),
            ("demand.population", self.demand.population),
            ("friction.competition", self.friction.competition),
            ("friction.rent", self.friction.rent),
            ("friction.accessibility", self.friction.accessibility),
            ("growth.trend", self.growth.trend),
            ("growth.vacancy", self.growth.vacancy),
            ("growth.infrastructure", self.growth.infrastructure),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let w = WeightConfig::default();
        assert_eq!(w, WeightConfig::DEFAULT);
        assert_eq!(w.top.demand, 0.40);
        assert_eq!(w.friction.competition, 0.40);
        assert_eq!(w.growth.trend, 0.50);
    }

    #[test]
    fn test_default_weights_are_balanced() {
        assert!(WeightConfig::DEFAULT.validate().all_valid());
        assert!(WeightConfig::DEFAULT.imbalances().is_empty());
    }

    #[test]
    fn test_imbalances_report_group_and_sum() {
        let mut w = WeightConfig::DEFAULT;
        w.top = TopWeights {
            demand: 0.5,
            friction: 0.3,
            growth: 0.3,
        };
        let imbalances = w.imbalances();
        assert_eq!(imbalances.len(), 1);
        assert_eq!(imbalances[0].group, "top");
        assert!((imbalances[0].sum - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_each_sub_group_can_fail_alone() {
        let mut demand = WeightConfig::DEFAULT;
        demand.demand.income = 0.40;
        let v = demand.validate();
        assert!(v.top && !v.demand && v.friction && v.growth);

        let mut friction = WeightConfig::DEFAULT;
        friction.friction.rent = 0.30;
        let v = friction.validate();
        assert!(v.top && v.demand && !v.friction && v.growth);

        let mut growth = WeightConfig::DEFAULT;
        growth.growth.trend = 0.60;
        let v = growth.validate();
        assert!(v.top && v.demand && v.friction && !v.growth);
        assert_eq!(growth.imbalances()[0].group, "growth");
    }

    #[test]
    fn test_out_of_range_weight_is_flagged_not_hidden() {
        let mut w = WeightConfig::DEFAULT;
        w.top = TopWeights {
            demand: 1.2,
            friction: 0.0,
            growth: 0.0,
        };
        // Clamping would give exactly 1.00; the supplied sum is 1.20
        assert!((w.clamped().group_sums()[0].1 - 1.0).abs() < 1e-12);
        assert!(!w.validate().top);
        let imbalances = w.imbalances();
        assert_eq!(imbalances.len(), 1);
        assert!((imbalances[0].sum - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_clamped_bounds_each_weight() {
        let mut w = WeightConfig::DEFAULT;
        w.demand.income = 1.7;
        w.growth.vacancy = -0.2;
        let c = w.clamped();
        assert_eq!(c.demand.income, 1.0);
        assert_eq!(c.growth.vacancy, 0.0);
        assert_eq!(c.top, w.top);
    }

    #[test]
    fn test_partial_weights_parse() {
        let yaml = r#"
top:
  demand: 0.5
  friction: 0.3
  growth: 0.2
"#;
        let w: WeightConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(w.top.demand, 0.5);
        assert_eq!(w.demand, WeightConfig::DEFAULT.demand);
        assert_eq!(w.growth, WeightConfig::DEFAULT.growth);
    }

    #[test]
    fn test_unknown_weight_key_rejected() {
        let yaml = r#"
top:
  demand: 0.5
  friction: 0.3
  growth: 0.2
  luck: 0.1
"#;
        assert!(serde_saphyr::from_str::<WeightConfig>(yaml).is_err());
    }

    #[test]
    fn test_weights_serde_roundtrip() {
        let w = WeightConfig::DEFAULT;
        let yaml = serde_saphyr::to_string(&w).unwrap();
        let parsed: WeightConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(w, parsed);
    }

    #[test]
    fn test_entries_cover_every_weight() {
        let entries = WeightConfig::DEFAULT.entries();
        let total: f64 = entries.iter().map(|(_, w)| w).sum();
        assert!((total - 4.0).abs() < 1e-9);
    }
}
