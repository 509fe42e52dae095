//! Price per square metre derivation.

use crate::domain::listing::ListingRecord;
use tracing::warn;

/// A listing together with its derived price per m2.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePerAreaRecord {
    pub listing: ListingRecord,
    pub price_per_m2: f64,
}

/// `price / floor_size` when the floor size is known, otherwise
/// `price / land_size`. `None` when neither size is usable or the quotient
/// overflows.
pub fn price_per_m2(price: f64, floor_size: f64, land_size: f64) -> Option<f64> {
    let size = if floor_size > 0.0 {
        floor_size
    } else if land_size > 0.0 {
        land_size
    } else {
        return None;
    };
    Some(price / size).filter(|v| v.is_finite())
}

/// Attach a price per m2 to every record; records without any size are
/// dropped so no division by zero reaches the statistics.
pub fn derive_prices(records: Vec<ListingRecord>) -> Vec<PricePerAreaRecord> {
    let mut out = Vec::with_capacity(records.len());
    for listing in records {
        match price_per_m2(listing.price, listing.floor_size, listing.land_size) {
            Some(price_per_m2) => out.push(PricePerAreaRecord {
                listing,
                price_per_m2,
            }),
            None => warn!(
                title = %listing.title,
                price = listing.price,
                "dropping listing without a usable floor or land size"
            ),
        }
    }
    out
}
