//! Investment valuation of a single property against its area's rent
//! statistics: income approach, gross rent multiplier, price/earnings ratio
//! and a z-score.
//!
//! The z-score compares the listed price with the area's mean rent *per m2*.
//! The two quantities are in different units, so for real listings the score
//! is a large positive number and not a calibrated risk measure.

use crate::domain::area_stats::{AreaRentStats, AreaStatsTable};

const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValuationError {
    #[error("area not found in rent statistics: {title}")]
    NotFound { title: String },

    #[error("division by zero computing {metric}")]
    DivisionByZero { metric: &'static str },

    #[error("{statistic} is not available for {title}")]
    MissingStatistic {
        title: String,
        statistic: &'static str,
    },

    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("{metric} is not a finite number")]
    NonFinite { metric: &'static str },
}

/// Gross rent income estimate and the cap rate it implies, each with a
/// one-standard-deviation band.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomeApproach {
    pub monthly_gross_rent_income: f64,
    pub stddev_monthly_gross_rent_income: f64,
    pub annual_gross_rent_income: f64,
    pub stddev_annual_gross_rent_income: f64,
    pub cap_rate: f64,
    pub stddev_cap_rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValuationResult {
    pub title: String,
    pub price: f64,
    pub floor_size: f64,
    pub income: IncomeApproach,
    pub gross_rent_multiplier: f64,
    pub price_to_earnings_ratio: f64,
    pub z_score: f64,
}

/// Thresholds used to judge a valuation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValuationTargets {
    /// Cap rate (percent) the property should beat.
    pub cap_rate: f64,
    /// GRM the property should stay below.
    pub gross_rent_multiplier: f64,
    /// P/E the property should stay below.
    pub price_to_earnings_ratio: f64,
    /// Absolute z-score beyond which the price is an outlier.
    pub z_score_outlier: f64,
}

impl Default for ValuationTargets {
    fn default() -> Self {
        Self {
            cap_rate: 8.0,
            gross_rent_multiplier: 10.0,
            price_to_earnings_ratio: 20.0,
            z_score_outlier: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValuationSignals {
    pub cap_rate_above_target: bool,
    pub grm_below_target: bool,
    pub pe_below_target: bool,
    pub z_score_outlier: bool,
}

impl ValuationResult {
    pub fn signals(&self, targets: &ValuationTargets) -> ValuationSignals {
        ValuationSignals {
            cap_rate_above_target: self.income.cap_rate > targets.cap_rate,
            grm_below_target: self.gross_rent_multiplier < targets.gross_rent_multiplier,
            pe_below_target: self.price_to_earnings_ratio < targets.price_to_earnings_ratio,
            z_score_outlier: self.z_score.abs() > targets.z_score_outlier,
        }
    }
}

fn lookup<'a>(stats: &'a AreaStatsTable, title: &str) -> Result<&'a AreaRentStats, ValuationError> {
    stats.get(title).ok_or_else(|| ValuationError::NotFound {
        title: title.to_string(),
    })
}

fn stddev_of(row: &AreaRentStats) -> Result<f64, ValuationError> {
    row.stddev_rent_per_m2
        .ok_or_else(|| ValuationError::MissingStatistic {
            title: row.title.clone(),
            statistic: "stddev rent per m2",
        })
}

fn check_input(field: &'static str, value: f64) -> Result<(), ValuationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValuationError::InvalidInput {
            field,
            reason: format!("expected a non-negative number, got {}", value),
        });
    }
    Ok(())
}

fn finite(value: f64, metric: &'static str) -> Result<f64, ValuationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValuationError::NonFinite { metric })
    }
}

fn divide(numerator: f64, denominator: f64, metric: &'static str) -> Result<f64, ValuationError> {
    if denominator == 0.0 {
        return Err(ValuationError::DivisionByZero { metric });
    }
    finite(numerator / denominator, metric)
}

/// Income approach: expected rent for `floor_size` m2 in `title`, and the
/// resulting cap rate at `price`.
pub fn calculate_income_approach(
    title: &str,
    price: f64,
    floor_size: f64,
    stats: &AreaStatsTable,
) -> Result<IncomeApproach, ValuationError> {
    check_input("price", price)?;
    check_input("floor_size", floor_size)?;
    let row = lookup(stats, title)?;
    let stddev = stddev_of(row)?;

    let monthly = finite(row.mean_rent_per_m2 * floor_size, "monthly gross rent income")?;
    let stddev_monthly = finite(stddev * floor_size, "monthly gross rent income")?;
    let annual = finite(monthly * MONTHS_PER_YEAR, "annual gross rent income")?;
    let stddev_annual = finite(stddev_monthly * MONTHS_PER_YEAR, "annual gross rent income")?;

    Ok(IncomeApproach {
        monthly_gross_rent_income: monthly,
        stddev_monthly_gross_rent_income: stddev_monthly,
        annual_gross_rent_income: annual,
        stddev_annual_gross_rent_income: stddev_annual,
        cap_rate: finite(divide(annual, price, "cap rate")? * 100.0, "cap rate")?,
        stddev_cap_rate: finite(divide(stddev_annual, price, "cap rate")? * 100.0, "cap rate")?,
    })
}

pub fn calculate_gross_rent_multiplier(
    price: f64,
    annual_gross_rent_income: f64,
) -> Result<f64, ValuationError> {
    if price == 0.0 {
        return Err(ValuationError::DivisionByZero {
            metric: "gross rent multiplier",
        });
    }
    divide(price, annual_gross_rent_income, "gross rent multiplier")
}

/// Same formula as the gross rent multiplier, reported under its own name.
pub fn calculate_price_to_earnings_ratio(
    price: f64,
    annual_gross_rent_income: f64,
) -> Result<f64, ValuationError> {
    if price == 0.0 {
        return Err(ValuationError::DivisionByZero {
            metric: "price to earnings ratio",
        });
    }
    divide(price, annual_gross_rent_income, "price to earnings ratio")
}

/// `(price - mean_rent_per_m2) / stddev_rent_per_m2` for the area.
pub fn calculate_z_score(title: &str, price: f64, stats: &AreaStatsTable) -> Result<f64, ValuationError> {
    check_input("price", price)?;
    let row = lookup(stats, title)?;
    let stddev = stddev_of(row)?;
    divide(price - row.mean_rent_per_m2, stddev, "z-score")
}

pub fn compute_valuation(
    title: &str,
    price: f64,
    floor_size: f64,
    stats: &AreaStatsTable,
) -> Result<ValuationResult, ValuationError> {
    let income = calculate_income_approach(title, price, floor_size, stats)?;
    let gross_rent_multiplier =
        calculate_gross_rent_multiplier(price, income.annual_gross_rent_income)?;
    let price_to_earnings_ratio =
        calculate_price_to_earnings_ratio(price, income.annual_gross_rent_income)?;
    let z_score = calculate_z_score(title, price, stats)?;

    Ok(ValuationResult {
        title: title.to_string(),
        price,
        floor_size,
        income,
        gross_rent_multiplier,
        price_to_earnings_ratio,
        z_score,
    })
}
