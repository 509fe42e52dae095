//! Listing source port trait.

use crate::domain::error::AnalyzerError;
use crate::domain::listing::RawListing;

/// Produces the raw listing rows for one analysis run.
pub trait ListingSource {
    fn fetch_listings(&self) -> Result<Vec<RawListing>, AnalyzerError>;
}
