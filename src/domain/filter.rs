//! Listing exclusion rules and filter profiles.
//!
//! A [`FilterRule`] is a named predicate over a [`ListingRecord`]; a record
//! matching any rule of a [`FilterProfile`] is dropped. Rules only ever
//! remove records, so the order they run in does not change the survivors.

use crate::domain::listing::{ListingRecord, SaleRent};
use std::fmt;
use tracing::debug;

pub const NO_FLOOR_SIZE_PLACEHOLDER: &str = "No floor size found";
pub const NO_LAND_SIZE_PLACEHOLDER: &str = "No land size found";

pub const MAX_PRICE: f64 = 2_000_000.0;
pub const RENT_PRICE_CAP: f64 = 25_000.0;
pub const COMPACT_MAX_SIZE: f64 = 85.0;

#[derive(Debug, Clone, PartialEq)]
pub enum FilterRule {
    /// Price missing or unparsable.
    MissingPrice,
    /// Neither floor nor land size is known.
    NoSizeInformation,
    ListingTypeIn(Vec<String>),
    /// Both sizes still carry the ingestion placeholder text.
    PlaceholderSizes,
    BannerIn(Vec<String>),
    PriceAbove(f64),
    /// Rent price cap applied to every listing regardless of sale/rent.
    PriceCap(f64),
    /// Price cap applied to rentals only.
    RentPriceAbove(f64),
    /// Floor size or land size above the limit.
    SizeAbove(f64),
    SaleRentIs(SaleRent),
}

impl FilterRule {
    pub fn matches(&self, record: &ListingRecord) -> bool {
        match self {
            FilterRule::MissingPrice => record.price == 0.0,
            FilterRule::NoSizeInformation => record.floor_size == 0.0 && record.land_size == 0.0,
            FilterRule::ListingTypeIn(types) => types.iter().any(|t| *t == record.listing_type),
            FilterRule::PlaceholderSizes => {
                record.land_size_text.as_deref() == Some(NO_LAND_SIZE_PLACEHOLDER)
                    && record.floor_size_text.as_deref() == Some(NO_FLOOR_SIZE_PLACEHOLDER)
            }
            FilterRule::BannerIn(banners) => banners.iter().any(|b| *b == record.banner),
            FilterRule::PriceAbove(limit) | FilterRule::PriceCap(limit) => record.price > *limit,
            FilterRule::RentPriceAbove(limit) => {
                record.price > *limit && record.sale_rent.is_rent()
            }
            FilterRule::SizeAbove(limit) => record.floor_size > *limit || record.land_size > *limit,
            FilterRule::SaleRentIs(kind) => record.sale_rent == *kind,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FilterRule::MissingPrice => "missing_price",
            FilterRule::NoSizeInformation => "no_size_information",
            FilterRule::ListingTypeIn(_) => "excluded_listing_type",
            FilterRule::PlaceholderSizes => "placeholder_sizes",
            FilterRule::BannerIn(_) => "unavailable_banner",
            FilterRule::PriceAbove(_) => "price_above",
            FilterRule::PriceCap(_) => "price_cap",
            FilterRule::RentPriceAbove(_) => "rent_price_above",
            FilterRule::SizeAbove(_) => "size_above",
            FilterRule::SaleRentIs(_) => "sale_rent_is",
        }
    }
}

impl fmt::Display for FilterRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterRule::MissingPrice => write!(f, "price == 0"),
            FilterRule::NoSizeInformation => write!(f, "floor_size == 0 AND land_size == 0"),
            FilterRule::ListingTypeIn(types) => write!(f, "listing_type IN [{}]", types.join(", ")),
            FilterRule::PlaceholderSizes => write!(
                f,
                "land_size == \"{}\" AND floor_size == \"{}\"",
                NO_LAND_SIZE_PLACEHOLDER, NO_FLOOR_SIZE_PLACEHOLDER
            ),
            FilterRule::BannerIn(banners) => write!(f, "banner IN [{}]", banners.join(", ")),
            FilterRule::PriceAbove(limit) => write!(f, "price > {}", limit),
            FilterRule::PriceCap(limit) => write!(f, "price > {} (any sale_rent)", limit),
            FilterRule::RentPriceAbove(limit) => {
                write!(f, "price > {} AND sale_rent == Rent", limit)
            }
            FilterRule::SizeAbove(limit) => {
                write!(f, "floor_size > {} OR land_size > {}", limit, limit)
            }
            FilterRule::SaleRentIs(kind) => write!(f, "sale_rent == {}", kind),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    Standard,
    Compact,
}

impl ProfileKind {
    pub const ALL: [ProfileKind; 2] = [ProfileKind::Standard, ProfileKind::Compact];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileKind::Standard => "standard",
            ProfileKind::Compact => "compact",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "standard" => Some(ProfileKind::Standard),
            "compact" => Some(ProfileKind::Compact),
            _ => None,
        }
    }
}

/// Price thresholds a profile is built with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceLimits {
    pub max_price: f64,
    pub rent_price_cap: f64,
}

impl Default for PriceLimits {
    fn default() -> Self {
        Self {
            max_price: MAX_PRICE,
            rent_price_cap: RENT_PRICE_CAP,
        }
    }
}

/// An ordered, named set of exclusion rules.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterProfile {
    pub name: String,
    pub rules: Vec<FilterRule>,
}

impl FilterProfile {
    pub fn from_kind(kind: ProfileKind, limits: PriceLimits) -> Self {
        match kind {
            ProfileKind::Standard => Self::standard_with(limits),
            ProfileKind::Compact => Self::compact_with(limits),
        }
    }

    /// Mixed sale/rent data: only `Other` is excluded and the rent cap
    /// applies to rentals alone.
    pub fn standard() -> Self {
        Self::standard_with(PriceLimits::default())
    }

    pub fn standard_with(limits: PriceLimits) -> Self {
        Self {
            name: ProfileKind::Standard.as_str().to_string(),
            rules: vec![
                FilterRule::MissingPrice,
                FilterRule::NoSizeInformation,
                FilterRule::ListingTypeIn(vec!["Other".into()]),
                FilterRule::PlaceholderSizes,
                unavailable_banners(),
                FilterRule::PriceAbove(limits.max_price),
                FilterRule::RentPriceAbove(limits.rent_price_cap),
            ],
        }
    }

    /// Small rental units only: houses and sales are dropped, the price cap
    /// is unconditional and sizes above 85 m2 are excluded.
    pub fn compact() -> Self {
        Self::compact_with(PriceLimits::default())
    }

    pub fn compact_with(limits: PriceLimits) -> Self {
        Self {
            name: ProfileKind::Compact.as_str().to_string(),
            rules: vec![
                FilterRule::MissingPrice,
                FilterRule::NoSizeInformation,
                FilterRule::SizeAbove(COMPACT_MAX_SIZE),
                FilterRule::ListingTypeIn(vec!["Other".into(), "House".into()]),
                FilterRule::PlaceholderSizes,
                unavailable_banners(),
                FilterRule::SaleRentIs(SaleRent::Sale),
                FilterRule::PriceAbove(limits.max_price),
                FilterRule::PriceCap(limits.rent_price_cap),
            ],
        }
    }

    /// First rule in profile order that excludes `record`.
    pub fn first_match(&self, record: &ListingRecord) -> Option<usize> {
        self.rules.iter().position(|rule| rule.matches(record))
    }

    pub fn excludes(&self, record: &ListingRecord) -> bool {
        self.first_match(record).is_some()
    }

    /// Drop every excluded record, keeping the relative order of survivors.
    pub fn apply(&self, records: Vec<ListingRecord>) -> (Vec<ListingRecord>, FilterReport) {
        let mut removed = vec![0usize; self.rules.len()];
        let input = records.len();

        let kept: Vec<ListingRecord> = records
            .into_iter()
            .filter(|record| match self.first_match(record) {
                Some(idx) => {
                    removed[idx] += 1;
                    false
                }
                None => true,
            })
            .collect();

        let report = FilterReport {
            profile: self.name.clone(),
            input,
            kept: kept.len(),
            removed_by_rule: self
                .rules
                .iter()
                .zip(removed)
                .map(|(rule, count)| (rule.to_string(), count))
                .collect(),
        };

        for (rule, count) in &report.removed_by_rule {
            debug!(profile = %self.name, rule = %rule, removed = count, "filter rule applied");
        }

        (kept, report)
    }
}

fn unavailable_banners() -> FilterRule {
    FilterRule::BannerIn(vec!["Under Offer".into(), "Sold".into()])
}

/// Removal counts for one filtering pass, attributed to the first matching rule.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterReport {
    pub profile: String,
    pub input: usize,
    pub kept: usize,
    pub removed_by_rule: Vec<(String, usize)>,
}

impl FilterReport {
    pub fn removed(&self) -> usize {
        self.input - self.kept
    }
}
