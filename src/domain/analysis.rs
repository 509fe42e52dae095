//! End-to-end analysis run: normalize, filter, derive prices, aggregate.

use crate::domain::area_stats::{self, AreaStatsTable};
use crate::domain::filter::{FilterProfile, FilterReport, PriceLimits, ProfileKind};
use crate::domain::listing::{self, RawListing};
use crate::domain::price::{self, PricePerAreaRecord};
use crate::domain::ranking::DEFAULT_RANKING_SIZE;
use crate::domain::valuation::ValuationTargets;
use std::path::PathBuf;
use tracing::info;

/// Everything one analysis run needs, passed in explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub input: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub profile_kind: ProfileKind,
    pub price_limits: PriceLimits,
    pub ranking_size: usize,
    pub targets: ValuationTargets,
}

impl AnalysisConfig {
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            output_dir: None,
            profile_kind: ProfileKind::Standard,
            price_limits: PriceLimits::default(),
            ranking_size: DEFAULT_RANKING_SIZE,
            targets: ValuationTargets::default(),
        }
    }

    pub fn profile(&self) -> FilterProfile {
        FilterProfile::from_kind(self.profile_kind, self.price_limits)
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub listings: Vec<PricePerAreaRecord>,
    pub stats: AreaStatsTable,
    pub filter_report: FilterReport,
}

pub fn run_analysis(raw: &[RawListing], profile: &FilterProfile) -> AnalysisResult {
    let normalized = listing::normalize_all(raw);
    info!(records = normalized.len(), "normalized listings");

    let (filtered, filter_report) = profile.apply(normalized);
    info!(
        profile = %profile.name,
        kept = filter_report.kept,
        removed = filter_report.removed(),
        "filtered listings"
    );

    let listings = price::derive_prices(filtered);
    let stats = area_stats::aggregate(&listings);
    info!(areas = stats.len(), "aggregated rent statistics");

    AnalysisResult {
        listings,
        stats,
        filter_report,
    }
}
