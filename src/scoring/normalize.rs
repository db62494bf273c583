use serde::{Deserialize, Serialize};

/// Scale an indicator value arrives on.
///
/// Dataset-sourced indicators are `Percent` (0-100). Values that a caller has
/// already mapped into 0-1 must be marked `Unit` explicitly: a normalized 0.92
/// and a raw 0.92 on the 0-100 scale look identical.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorScale {
    /// Already on 0-1
    Unit,
    /// Raw 0-100 index
    #[default]
    Percent,
}

impl IndicatorScale {
    pub fn max(&self) -> f64 {
        match self {
            IndicatorScale::Unit => 1.0,
            IndicatorScale::Percent => 100.0,
        }
    }
}

/// Map `value` into [0,1] given the scale it was measured on.
/// Out-of-range input is clamped, never rejected.
pub fn normalize(value: f64, scale: IndicatorScale) -> f64 {
    normalize_with_max(value, scale.max())
}

/// Like [`normalize`] for an arbitrary scale maximum. A non-positive `max`
/// is treated as an already-normalized value.
pub fn normalize_with_max(value: f64, max: f64) -> f64 {
    let scaled = if max > 0.0 { value / max } else { value };
    scaled.clamp(0.0, 1.0)
}

/// True when `value` lies outside what `scale` declares and will be clamped.
pub fn is_out_of_range(value: f64, scale: IndicatorScale) -> bool {
    value < 0.0 || value > scale.max()
}
