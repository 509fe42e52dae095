//! Listing records and field normalization.
//!
//! A [`RawListing`] is one row as the ingestion layer hands it over: every
//! field optional and untyped. [`normalize`] turns it into a [`ListingRecord`]
//! with guaranteed numeric types. Normalization is total: a value that does
//! not parse as a number becomes `0.0`, never an error.

use serde::Deserialize;
use std::fmt;

/// Textual stand-in for a missing cell, matching what the ingestion layer emits.
pub const MISSING_TEXT: &str = "nan";

/// Column names every listing source must provide.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "price",
    "floor_size",
    "land_size",
    "bedrooms",
    "bathrooms",
    "listing_type",
    "sale_rent",
    "title",
    "banner",
];

/// One unprocessed listing row.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawListing {
    pub price: Option<String>,
    pub floor_size: Option<String>,
    pub land_size: Option<String>,
    pub bedrooms: Option<String>,
    pub bathrooms: Option<String>,
    pub listing_type: Option<String>,
    pub sale_rent: Option<String>,
    pub title: Option<String>,
    pub banner: Option<String>,
}

/// Transaction type of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SaleRent {
    Sale,
    Rent,
    Other(String),
}

impl SaleRent {
    pub fn is_rent(&self) -> bool {
        matches!(self, SaleRent::Rent)
    }
}

impl From<&str> for SaleRent {
    fn from(value: &str) -> Self {
        match value {
            "Sale" => SaleRent::Sale,
            "Rent" => SaleRent::Rent,
            other => SaleRent::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SaleRent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaleRent::Sale => write!(f, "Sale"),
            SaleRent::Rent => write!(f, "Rent"),
            SaleRent::Other(s) => write!(f, "{}", s),
        }
    }
}

/// A normalized listing.
///
/// `floor_size_text` and `land_size_text` hold the original cell text when
/// the size fell back to zero because it was not numeric, e.g.
/// `"No land size found"`.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRecord {
    pub price: f64,
    pub floor_size: f64,
    pub land_size: f64,
    pub bedrooms: f64,
    pub bathrooms: f64,
    pub listing_type: String,
    pub sale_rent: SaleRent,
    pub title: String,
    pub banner: String,
    pub floor_size_text: Option<String>,
    pub land_size_text: Option<String>,
}

/// Parse a numeric cell, falling back to `0.0`.
///
/// Empty, non-numeric, non-finite and negative values all become zero.
pub fn parse_number(value: Option<&str>) -> f64 {
    value
        .map(str::trim)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(0.0)
}

fn text_or_missing(value: Option<&str>) -> String {
    value.unwrap_or(MISSING_TEXT).to_string()
}

/// Original text of a size cell that did not survive parsing.
fn unparsed_text(value: Option<&str>, parsed: f64) -> Option<String> {
    match value {
        Some(s) if parsed == 0.0 && s.trim().parse::<f64>().is_err() => Some(s.to_string()),
        _ => None,
    }
}

pub fn normalize(raw: &RawListing) -> ListingRecord {
    let floor_size = parse_number(raw.floor_size.as_deref());
    let land_size = parse_number(raw.land_size.as_deref());

    ListingRecord {
        price: parse_number(raw.price.as_deref()),
        floor_size,
        land_size,
        bedrooms: parse_number(raw.bedrooms.as_deref()),
        bathrooms: parse_number(raw.bathrooms.as_deref()),
        listing_type: text_or_missing(raw.listing_type.as_deref()),
        sale_rent: SaleRent::from(text_or_missing(raw.sale_rent.as_deref()).as_str()),
        title: text_or_missing(raw.title.as_deref()),
        banner: text_or_missing(raw.banner.as_deref()),
        floor_size_text: unparsed_text(raw.floor_size.as_deref(), floor_size),
        land_size_text: unparsed_text(raw.land_size.as_deref(), land_size),
    }
}

pub fn normalize_all(raw: &[RawListing]) -> Vec<ListingRecord> {
    raw.iter().map(normalize).collect()
}
