//! Top/bottom-N views over area rent statistics.
//!
//! Views are stable: areas that tie on the ranked metric keep the order they
//! have in the [`AreaStatsTable`] (descending mean, then title).

use crate::domain::area_stats::{AreaRentStats, AreaStatsTable};
use std::fmt;

pub const DEFAULT_RANKING_SIZE: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RentMetric {
    Mean,
    Max,
    Min,
    StdDev,
}

impl RentMetric {
    pub fn column_name(&self) -> &'static str {
        match self {
            RentMetric::Mean => "mean rent per m2",
            RentMetric::Max => "max rent per m2",
            RentMetric::Min => "min rent per m2",
            RentMetric::StdDev => "stddev rent per m2",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            RentMetric::Mean => "Mean Rent per m2",
            RentMetric::Max => "Maximum Rent per m2",
            RentMetric::Min => "Minimum Rent per m2",
            RentMetric::StdDev => "Standard Deviation in Rent per m2",
        }
    }

    pub fn value(&self, row: &AreaRentStats) -> Option<f64> {
        match self {
            RentMetric::Mean => Some(row.mean_rent_per_m2),
            RentMetric::Max => Some(row.max_rent_per_m2),
            RentMetric::Min => Some(row.min_rent_per_m2),
            RentMetric::StdDev => row.stddev_rent_per_m2,
        }
    }
}

impl fmt::Display for RentMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedArea {
    pub title: String,
    pub value: f64,
    pub rental_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankingView {
    pub metric: RentMetric,
    pub direction: Direction,
    pub rows: Vec<RankedArea>,
}

impl RankingView {
    pub fn title(&self) -> String {
        let prefix = match self.direction {
            Direction::Top => "Top",
            Direction::Bottom => "Lowest",
        };
        format!("{} {} Areas by {}", prefix, self.rows.len(), self.metric.label())
    }
}

/// Select the `n` most extreme areas by `metric`.
///
/// `Top` sorts descending, `Bottom` ascending. Areas without a value for the
/// metric are skipped.
pub fn rank(table: &AreaStatsTable, metric: RentMetric, direction: Direction, n: usize) -> RankingView {
    let mut candidates: Vec<(f64, &AreaRentStats)> = table
        .rows()
        .iter()
        .filter_map(|row| metric.value(row).map(|v| (v, row)))
        .collect();

    match direction {
        Direction::Top => candidates.sort_by(|a, b| b.0.total_cmp(&a.0)),
        Direction::Bottom => candidates.sort_by(|a, b| a.0.total_cmp(&b.0)),
    }

    let rows = candidates
        .into_iter()
        .take(n)
        .map(|(value, row)| RankedArea {
            title: row.title.clone(),
            value,
            rental_count: row.rental_count,
        })
        .collect();

    RankingView {
        metric,
        direction,
        rows,
    }
}

pub fn top_mean(table: &AreaStatsTable, n: usize) -> RankingView {
    rank(table, RentMetric::Mean, Direction::Top, n)
}

pub fn bottom_mean(table: &AreaStatsTable, n: usize) -> RankingView {
    rank(table, RentMetric::Mean, Direction::Bottom, n)
}

pub fn top_max(table: &AreaStatsTable, n: usize) -> RankingView {
    rank(table, RentMetric::Max, Direction::Top, n)
}

pub fn bottom_min(table: &AreaStatsTable, n: usize) -> RankingView {
    rank(table, RentMetric::Min, Direction::Bottom, n)
}

pub fn top_stddev(table: &AreaStatsTable, n: usize) -> RankingView {
    rank(table, RentMetric::StdDev, Direction::Top, n)
}

pub fn bottom_stddev(table: &AreaStatsTable, n: usize) -> RankingView {
    rank(table, RentMetric::StdDev, Direction::Bottom, n)
}

/// The six standard views, in presentation order.
pub fn standard_views(table: &AreaStatsTable, n: usize) -> Vec<RankingView> {
    vec![
        top_mean(table, n),
        top_max(table, n),
        bottom_mean(table, n),
        bottom_min(table, n),
        top_stddev(table, n),
        bottom_stddev(table, n),
    ]
}
