#![allow(dead_code)]

use propanalyzer::domain::error::AnalyzerError;
pub use propanalyzer::domain::listing::RawListing;
use propanalyzer::ports::listing_port::ListingSource;

pub struct MockListingSource {
    pub rows: Vec<RawListing>,
    pub error: Option<String>,
}

impl MockListingSource {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            error: None,
        }
    }

    pub fn with_rows(mut self, rows: Vec<RawListing>) -> Self {
        self.rows.extend(rows);
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl ListingSource for MockListingSource {
    fn fetch_listings(&self) -> Result<Vec<RawListing>, AnalyzerError> {
        if let Some(reason) = &self.error {
            return Err(AnalyzerError::Ingest {
                source_name: "mock".to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self.rows.clone())
    }
}

pub fn make_listing(
    title: &str,
    price: &str,
    floor_size: &str,
    land_size: &str,
    listing_type: &str,
    sale_rent: &str,
    banner: &str,
) -> RawListing {
    RawListing {
        price: Some(price.to_string()),
        floor_size: Some(floor_size.to_string()),
        land_size: Some(land_size.to_string()),
        bedrooms: Some("2".to_string()),
        bathrooms: Some("1".to_string()),
        listing_type: Some(listing_type.to_string()),
        sale_rent: Some(sale_rent.to_string()),
        title: Some(title.to_string()),
        banner: if banner.is_empty() {
            None
        } else {
            Some(banner.to_string())
        },
    }
}

/// Apartment rental with floor size and no land size.
pub fn make_rental(title: &str, price: f64, floor_size: f64) -> RawListing {
    make_listing(
        title,
        &price.to_string(),
        &floor_size.to_string(),
        "No land size found",
        "Apartment",
        "Rent",
        "",
    )
}

pub fn make_sale(title: &str, price: f64, floor_size: f64) -> RawListing {
    make_listing(
        title,
        &price.to_string(),
        &floor_size.to_string(),
        "No land size found",
        "Apartment",
        "Sale",
        "",
    )
}

/// Three areas with known rents per m2, plus noise every profile removes.
///
/// - De Velde: 140, 150, 160 per m2 (mean 150, stddev 10)
/// - Bakoven: 90, 110 per m2 (mean 100)
/// - Lonely: a single rental
pub fn sample_market() -> Vec<RawListing> {
    vec![
        make_rental("De Velde", 7000.0, 50.0),
        make_rental("De Velde", 12000.0, 80.0),
        make_rental("De Velde", 9600.0, 60.0),
        make_rental("Bakoven", 4500.0, 50.0),
        make_rental("Bakoven", 6600.0, 60.0),
        make_rental("Lonely", 8000.0, 40.0),
        make_sale("De Velde", 1_750_000.0, 82.0),
        make_listing("De Velde", "POA", "60", "0", "Apartment", "Rent", ""),
        make_listing("Bakoven", "8000", "70", "0", "Apartment", "Rent", "Under Offer"),
        make_listing("Bakoven", "5000", "50", "0", "Other", "Rent", ""),
        make_listing("Bakoven", "30000", "50", "0", "Apartment", "Rent", ""),
        make_listing("Bakoven", "2500000", "300", "0", "House", "Sale", ""),
        make_listing(
            "Bakoven",
            "5000",
            "No floor size found",
            "No land size found",
            "Apartment",
            "Rent",
            "",
        ),
    ]
}

pub const SAMPLE_CSV_HEADER: &str =
    "price,floor_size,land_size,bedrooms,bathrooms,listing_type,sale_rent,title,banner\n";

pub fn to_csv(rows: &[RawListing]) -> String {
    let mut out = SAMPLE_CSV_HEADER.to_string();
    for r in rows {
        let cells = [
            &r.price,
            &r.floor_size,
            &r.land_size,
            &r.bedrooms,
            &r.bathrooms,
            &r.listing_type,
            &r.sale_rent,
            &r.title,
            &r.banner,
        ];
        let line: Vec<&str> = cells.iter().map(|c| c.as_deref().unwrap_or("")).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}
