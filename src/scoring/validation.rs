use serde::Serialize;

/// Per-group weight-sum check attached to every score.
///
/// A `false` group is advisory: the score it accompanies was still computed
/// with the exact weights supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeightValidation {
    pub top: bool,
    pub demand: bool,
    pub friction: bool,
    pub growth: bool,
}

impl WeightValidation {
    pub fn all_valid(&self) -> bool {
        self.top && self.demand && self.friction && self.growth
    }

    /// Names of the groups that failed the check.
    pub fn invalid_groups(&self) -> Vec<&'static str> {
        [
            ("top", self.top),
            ("demand", self.demand),
            ("friction", self.friction),
            ("growth", self.growth),
        ]
        .into_iter()
        .filter(|(_, ok)| !ok)
        .map(|(name, _)| name)
        .collect()
    }
}

/// `round(sum, 2) == 1.00`, compared in whole hundredths.
pub fn sums_to_one(sum: f64) -> bool {
    sum.is_finite() && (sum * 100.0).round() as i64 == 100
}
