//! CSV file listing adapter.

use crate::domain::error::AnalyzerError;
use crate::domain::listing::{RawListing, REQUIRED_COLUMNS};
use crate::ports::listing_port::ListingSource;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Reads listings from a header-named CSV file.
///
/// Column order is free and extra columns are ignored, but all nine
/// listing columns must be present in the header.
pub struct CsvListingAdapter {
    path: PathBuf,
}

impl CsvListingAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn ingest_error(&self, reason: String) -> AnalyzerError {
        AnalyzerError::Ingest {
            source_name: self.path.display().to_string(),
            reason,
        }
    }
}

impl ListingSource for CsvListingAdapter {
    fn fetch_listings(&self) -> Result<Vec<RawListing>, AnalyzerError> {
        let content = fs::read_to_string(&self.path)
            .map_err(|e| self.ingest_error(format!("failed to read file: {}", e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());

        let headers = rdr
            .headers()
            .map_err(|e| self.ingest_error(format!("CSV header error: {}", e)))?
            .clone();
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|col| !headers.iter().any(|h| h == *col))
            .collect();
        if !missing.is_empty() {
            return Err(self.ingest_error(format!("missing columns: {}", missing.join(", "))));
        }

        let mut listings = Vec::new();
        for result in rdr.deserialize::<RawListing>() {
            let row = result.map_err(|e| self.ingest_error(format!("CSV parse error: {}", e)))?;
            listings.push(row);
        }

        info!(path = %self.path.display(), rows = listings.len(), "read listings");
        Ok(listings)
    }
}
