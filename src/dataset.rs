use serde::Deserialize;
use std::fs;
use std::io::Read;
use std::path::Path;

use crate::scoring::{IndicatorScale, IndicatorSet, ValidationError};

/// Neighbourhoods shipped with the binary, 0-100 scale.
pub const BUNDLED_DATASET: &str = include_str!("../data/kolkata.yaml");

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read dataset at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML dataset: {0}")]
    Yaml(#[from] serde_saphyr::Error),

    #[error("invalid JSON dataset: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid CSV dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("unsupported dataset format '{0}' (expected .yaml, .yml, .json or .csv)")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Yaml,
    Json,
    Csv,
}

impl DatasetFormat {
    pub fn from_path(path: &Path) -> Result<Self, DatasetError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "yaml" | "yml" => Ok(DatasetFormat::Yaml),
            "json" => Ok(DatasetFormat::Json),
            "csv" => Ok(DatasetFormat::Csv),
            _ => Err(DatasetError::UnsupportedFormat(ext)),
        }
    }
}

/// A field as it appears in the source, before it is known to be a number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Number(f64),
    Text(String),
}

/// A dataset record with every field optional, so absence can be reported
/// by name instead of as a parse failure.
#[derive(Debug, Clone, Deserialize)]
struct RawLocation {
    name: Option<String>,
    latitude: Option<RawValue>,
    longitude: Option<RawValue>,
    income_index: Option<RawValue>,
    #[serde(alias = "foot_traffic_proxy")]
    foot_traffic_index: Option<RawValue>,
    population_density_index: Option<RawValue>,
    competition_index: Option<RawValue>,
    commercial_rent_index: Option<RawValue>,
    accessibility_penalty: Option<RawValue>,
    area_growth_trend: Option<RawValue>,
    vacancy_rate_improvement: Option<RawValue>,
    infrastructure_investment_index: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct RawDataset {
    locations: Vec<RawLocation>,
}

impl RawLocation {
    fn into_indicators(self, position: usize, scale: IndicatorScale) -> Result<IndicatorSet, ValidationError> {
        let record = format!("record #{}", position + 1);
        let location = match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            Some(_) => return Err(ValidationError::EmptyName { location: record }),
            None => {
                return Err(ValidationError::Missing {
                    location: record,
                    field: "name",
                })
            }
        };

        let number = |field: &'static str, raw: Option<RawValue>| -> Result<f64, ValidationError> {
            match raw {
                None => Err(ValidationError::Missing {
                    location: location.clone(),
                    field,
                }),
                Some(RawValue::Number(v)) => Ok(v),
                Some(RawValue::Text(text)) => {
                    text.trim()
                        .parse::<f64>()
                        .map_err(|_| ValidationError::NotNumeric {
                            location: location.clone(),
                            field,
                            value: text.clone(),
                        })
                }
            }
        };

        let set = IndicatorSet {
            latitude: number("latitude", self.latitude)?,
            longitude: number("longitude", self.longitude)?,
            income_index: number("income_index", self.income_index)?,
            foot_traffic_index: number("foot_traffic_index", self.foot_traffic_index)?,
            population_density_index: number("population_density_index", self.population_density_index)?,
            competition_index: number("competition_index", self.competition_index)?,
            commercial_rent_index: number("commercial_rent_index", self.commercial_rent_index)?,
            accessibility_penalty: number("accessibility_penalty", self.accessibility_penalty)?,
            clustering_benefit_factor: 0.0,
            area_growth_trend: number("area_growth_trend", self.area_growth_trend)?,
            vacancy_rate_improvement: number("vacancy_rate_improvement", self.vacancy_rate_improvement)?,
            infrastructure_investment_index: number(
                "infrastructure_investment_index",
                self.infrastructure_investment_index,
            )?,
            scale,
            name: location.clone(),
        };
        set.validate()?;
        Ok(set)
    }
}

fn convert(raw: Vec<RawLocation>, scale: IndicatorScale) -> Result<Vec<IndicatorSet>, DatasetError> {
    raw.into_iter()
        .enumerate()
        .map(|(i, r)| r.into_indicators(i, scale).map_err(DatasetError::from))
        .collect()
}

/// Parse a YAML or JSON document of the form `{ locations: [...] }`.
pub fn parse_document(
    content: &str,
    format: DatasetFormat,
    scale: IndicatorScale,
) -> Result<Vec<IndicatorSet>, DatasetError> {
    let raw: RawDataset = match format {
        DatasetFormat::Yaml => serde_saphyr::from_str(content)?,
        DatasetFormat::Json => serde_json::from_str(content)?,
        DatasetFormat::Csv => return parse_csv(content.as_bytes(), scale),
    };
    convert(raw.locations, scale)
}

/// Parse CSV with a header row naming the indicator columns.
pub fn parse_csv<R: Read>(reader: R, scale: IndicatorScale) -> Result<Vec<IndicatorSet>, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut raw = Vec::new();
    for record in csv_reader.deserialize::<RawLocation>() {
        raw.push(record?);
    }
    convert(raw, scale)
}

/// Load a dataset file, picking the format from its extension.
pub fn load_dataset(path: &Path, scale: IndicatorScale) -> Result<Vec<IndicatorSet>, DatasetError> {
    let format = DatasetFormat::from_path(path)?;
    let content = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_document(&content, format, scale)
}

/// The bundled Kolkata dataset.
pub fn bundled_dataset() -> Result<Vec<IndicatorSet>, DatasetError> {
    parse_document(BUNDLED_DATASET, DatasetFormat::Yaml, IndicatorScale::Percent)
}
