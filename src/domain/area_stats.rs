//! Per-area rental statistics.
//!
//! Rental listings are grouped by `title` and summarised over their price per
//! m2. Areas with a single rental observation have no sample standard
//! deviation and are left out of the published table.

use crate::domain::price::PricePerAreaRecord;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaRentStats {
    pub title: String,
    pub mean_rent_per_m2: f64,
    pub max_rent_per_m2: f64,
    pub min_rent_per_m2: f64,
    pub stddev_rent_per_m2: Option<f64>,
    pub rental_count: usize,
}

/// Published area statistics, ordered by descending mean rent per m2.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AreaStatsTable {
    rows: Vec<AreaRentStats>,
}

impl AreaStatsTable {
    pub fn new(rows: Vec<AreaRentStats>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[AreaRentStats] {
        &self.rows
    }

    pub fn get(&self, title: &str) -> Option<&AreaRentStats> {
        self.rows.iter().find(|row| row.title == title)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Mean, max, min and sample standard deviation of `values`.
///
/// Returns `None` for an empty slice; the standard deviation is `None` below
/// two observations. The mean is kept within `[min, max]` against rounding.
pub fn summarize(values: &[f64]) -> Option<(f64, f64, f64, Option<f64>)> {
    if values.is_empty() {
        return None;
    }

    let n = values.len() as f64;
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mean = (values.iter().sum::<f64>() / n).max(min).min(max);

    let stddev = if values.len() >= 2 {
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        Some(variance.sqrt())
    } else {
        None
    };

    Some((mean, max, min, stddev))
}

/// Every rental area with at least one observation, in title order.
pub fn rent_stats_by_area(records: &[PricePerAreaRecord]) -> Vec<AreaRentStats> {
    let rentals: Vec<&PricePerAreaRecord> = records
        .iter()
        .filter(|r| r.listing.sale_rent.is_rent())
        .collect();

    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for r in &rentals {
        groups
            .entry(r.listing.title.as_str())
            .or_default()
            .push(r.price_per_m2);
    }

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for r in &rentals {
        *counts.entry(r.listing.title.as_str()).or_insert(0) += 1;
    }

    groups
        .into_iter()
        .filter_map(|(title, values)| {
            let (mean, max, min, stddev) = summarize(&values)?;
            Some(AreaRentStats {
                title: title.to_string(),
                mean_rent_per_m2: mean,
                max_rent_per_m2: max,
                min_rent_per_m2: min,
                stddev_rent_per_m2: stddev,
                rental_count: counts.get(title).copied().unwrap_or(0),
            })
        })
        .collect()
}

/// Build the published table: areas without a standard deviation are
/// dropped and the rest sorted by descending mean (stable, ties keep
/// title order).
pub fn aggregate(records: &[PricePerAreaRecord]) -> AreaStatsTable {
    let mut rows: Vec<AreaRentStats> = rent_stats_by_area(records)
        .into_iter()
        .filter(|row| row.stddev_rent_per_m2.is_some())
        .collect();

    rows.sort_by(|a, b| b.mean_rent_per_m2.total_cmp(&a.mean_rent_per_m2));
    AreaStatsTable::new(rows)
}
