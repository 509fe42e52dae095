//! Core domain types and logic.

pub mod listing;
pub mod filter;
pub mod price;
pub mod area_stats;
pub mod ranking;
pub mod valuation;
pub mod analysis;
pub mod config_validation;
pub mod error;
