use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::ranking::RankedResult;

/// One exported row: scores first, then the nine raw indicators as given.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    rank: usize,
    name: &'a str,
    location_score: f64,
    demand_score: f64,
    friction_score: f64,
    growth_score: f64,
    income_index: f64,
    foot_traffic_index: f64,
    population_density_index: f64,
    competition_index: f64,
    commercial_rent_index: f64,
    accessibility_penalty: f64,
    area_growth_trend: f64,
    vacancy_rate_improvement: f64,
    infrastructure_investment_index: f64,
}

impl<'a> From<&'a RankedResult> for ExportRow<'a> {
    fn from(r: &'a RankedResult) -> Self {
        let ind = &r.result.indicators;
        ExportRow {
            rank: r.rank,
            name: &r.result.name,
            location_score: r.result.location_score,
            demand_score: r.result.demand_score,
            friction_score: r.result.friction_score,
            growth_score: r.result.growth_score,
            income_index: ind.income_index,
            foot_traffic_index: ind.foot_traffic_index,
            population_density_index: ind.population_density_index,
            competition_index: ind.competition_index,
            commercial_rent_index: ind.commercial_rent_index,
            accessibility_penalty: ind.accessibility_penalty,
            area_growth_trend: ind.area_growth_trend,
            vacancy_rate_improvement: ind.vacancy_rate_improvement,
            infrastructure_investment_index: ind.infrastructure_investment_index,
        }
    }
}

/// Write ranked results as CSV with a header row.
pub fn write_csv<W: Write>(writer: W, ranked: &[RankedResult]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for r in ranked {
        csv_writer.serialize(ExportRow::from(r))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Export ranked results to `path` atomically.
///
/// An empty list produces an empty file: without rows the serializer never
/// emits a header.
pub fn export_csv(path: &Path, ranked: &[RankedResult]) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    write_csv(&mut file, ranked).context("Failed to write CSV export")?;
    file.commit()
        .with_context(|| format!("Failed to save export to {}", path.display()))?;
    Ok(())
}
