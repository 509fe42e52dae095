//! CSV report adapter implementing ReportPort.
//!
//! Writes the two analysis artifacts into an output directory:
//! `listings_clean.csv` (filtered listings with price per m2) and
//! `area_rent_stats.csv` (published area statistics).

use crate::domain::analysis::AnalysisResult;
use crate::domain::error::AnalyzerError;
use crate::domain::price::PricePerAreaRecord;
use crate::ports::report_port::ReportPort;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

pub const LISTINGS_FILE: &str = "listings_clean.csv";
pub const STATS_FILE: &str = "area_rent_stats.csv";

#[derive(Serialize)]
struct CleanListingRow<'a> {
    title: &'a str,
    price: f64,
    floor_size: f64,
    land_size: f64,
    bedrooms: f64,
    bathrooms: f64,
    listing_type: &'a str,
    sale_rent: String,
    banner: &'a str,
    price_per_m2: f64,
}

impl<'a> From<&'a PricePerAreaRecord> for CleanListingRow<'a> {
    fn from(record: &'a PricePerAreaRecord) -> Self {
        let l = &record.listing;
        Self {
            title: &l.title,
            price: l.price,
            floor_size: l.floor_size,
            land_size: l.land_size,
            bedrooms: l.bedrooms,
            bathrooms: l.bathrooms,
            listing_type: &l.listing_type,
            sale_rent: l.sale_rent.to_string(),
            banner: &l.banner,
            price_per_m2: record.price_per_m2,
        }
    }
}

pub struct CsvReportAdapter;

fn report_error(path: &Path, e: impl std::fmt::Display) -> AnalyzerError {
    AnalyzerError::Report {
        reason: format!("{}: {}", path.display(), e),
    }
}

fn write_rows<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> Result<(), AnalyzerError> {
    let mut wtr = csv::Writer::from_path(path).map_err(|e| report_error(path, e))?;
    for row in rows {
        wtr.serialize(row).map_err(|e| report_error(path, e))?;
    }
    wtr.flush().map_err(|e| report_error(path, e))?;
    Ok(())
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, result: &AnalysisResult, output_dir: &Path) -> Result<(), AnalyzerError> {
        fs::create_dir_all(output_dir)?;

        let listings_path = output_dir.join(LISTINGS_FILE);
        write_rows(&listings_path, result.listings.iter().map(CleanListingRow::from))?;

        let stats_path = output_dir.join(STATS_FILE);
        write_rows(&stats_path, result.stats.rows())?;

        info!(
            dir = %output_dir.display(),
            listings = result.listings.len(),
            areas = result.stats.len(),
            "wrote analysis artifacts"
        );
        Ok(())
    }
}
