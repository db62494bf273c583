use serde::{Deserialize, Serialize};

use super::error::ValidationError;
use super::normalize::{is_out_of_range, normalize, IndicatorScale};

/// Upper bound of the clustering benefit factor: at most a 50% discount on
/// competition.
pub const MAX_CLUSTERING_BENEFIT: f64 = 0.5;

/// Canonical indicator names, in export order.
pub const INDICATOR_FIELDS: [&str; 9] = [
    "income_index",
    "foot_traffic_index",
    "population_density_index",
    "competition_index",
    "commercial_rent_index",
    "accessibility_penalty",
    "area_growth_trend",
    "vacancy_rate_improvement",
    "infrastructure_investment_index",
];

/// One location's raw inputs.
///
/// `clustering_benefit_factor` belongs to the business type, not the place;
/// callers resolve it and attach it with [`IndicatorSet::with_clustering_benefit`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct IndicatorSet {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,

    pub income_index: f64,
    #[serde(alias = "foot_traffic_proxy")]
    pub foot_traffic_index: f64,
    pub population_density_index: f64,

    pub competition_index: f64,
    pub commercial_rent_index: f64,
    pub accessibility_penalty: f64,
    #[serde(default)]
    pub clustering_benefit_factor: f64,

    pub area_growth_trend: f64,
    pub vacancy_rate_improvement: f64,
    pub infrastructure_investment_index: f64,

    /// Scale the nine indicators are expressed on
    #[serde(default)]
    pub scale: IndicatorScale,
}

/// The nine indicators mapped into [0,1], plus the clamped CBF.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedIndicators {
    pub income: f64,
    pub foot_traffic: f64,
    pub population: f64,
    pub competition: f64,
    pub rent: f64,
    pub accessibility: f64,
    pub clustering_benefit: f64,
    pub trend: f64,
    pub vacancy: f64,
    pub infrastructure: f64,
}

impl IndicatorSet {
    pub fn with_clustering_benefit(mut self, cbf: f64) -> Self {
        self.clustering_benefit_factor = cbf;
        self
    }

    pub fn with_scale(mut self, scale: IndicatorScale) -> Self {
        self.scale = scale;
        self
    }

    /// The nine indicator values as given, paired with their canonical names.
    pub fn indicator_values(&self) -> [(&'static str, f64); 9] {
        [
            (INDICATOR_FIELDS[0], self.income_index),
            (INDICATOR_FIELDS[1], self.foot_traffic_index),
            (INDICATOR_FIELDS[2], self.population_density_index),
            (INDICATOR_FIELDS[3], self.competition_index),
            (INDICATOR_FIELDS[4], self.commercial_rent_index),
            (INDICATOR_FIELDS[5], self.accessibility_penalty),
            (INDICATOR_FIELDS[6], self.area_growth_trend),
            (INDICATOR_FIELDS[7], self.vacancy_rate_improvement),
            (INDICATOR_FIELDS[8], self.infrastructure_investment_index),
        ]
    }

    /// Reject inputs that can't be scored at all.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName {
                location: format!("location at ({}, {})", self.latitude, self.longitude),
            });
        }

        let numeric = self
            .indicator_values()
            .into_iter()
            .chain([
                ("clustering_benefit_factor", self.clustering_benefit_factor),
                ("latitude", self.latitude),
                ("longitude", self.longitude),
            ]);
        for (field, value) in numeric {
            if !value.is_finite() {
                return Err(ValidationError::NotFinite {
                    location: self.name.clone(),
                    field,
                });
            }
        }

        for (field, value, limit) in [
            ("latitude", self.latitude, 90.0),
            ("longitude", self.longitude, 180.0),
        ] {
            if value.abs() > limit {
                return Err(ValidationError::OutOfRange {
                    location: self.name.clone(),
                    field,
                    value,
                });
            }
        }

        Ok(())
    }

    /// Fields whose values will be clamped during scoring.
    pub fn clamped_fields(&self) -> Vec<&'static str> {
        let mut fields: Vec<&'static str> = self
            .indicator_values()
            .into_iter()
            .filter(|(_, v)| is_out_of_range(*v, self.scale))
            .map(|(field, _)| field)
            .collect();
        if !(0.0..=MAX_CLUSTERING_BENEFIT).contains(&self.clustering_benefit_factor) {
            fields.push("clustering_benefit_factor");
        }
        fields
    }

    pub fn normalized(&self) -> NormalizedIndicators {
        let n = |v: f64| normalize(v, self.scale);
        NormalizedIndicators {
            income: n(self.income_index),
            foot_traffic: n(self.foot_traffic_index),
            population: n(self.population_density_index),
            competition: n(self.competition_index),
            rent: n(self.commercial_rent_index),
            accessibility: n(self.accessibility_penalty),
            clustering_benefit: self
                .clustering_benefit_factor
                .clamp(0.0, MAX_CLUSTERING_BENEFIT),
            trend: n(self.area_growth_trend),
            vacancy: n(self.vacancy_rate_improvement),
            infrastructure: n(self.infrastructure_investment_index),
        }
    }
}
