//! Configuration validation.
//!
//! Validates all config fields before an analysis runs.

use crate::domain::error::AnalyzerError;
use crate::domain::filter::ProfileKind;
use crate::ports::config_port::ConfigPort;

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), AnalyzerError> {
    validate_input(config)?;
    validate_profile(config)?;
    validate_price_limits(config)?;
    validate_ranking_size(config)?;
    validate_targets(config)?;
    Ok(())
}

fn validate_input(config: &dyn ConfigPort) -> Result<(), AnalyzerError> {
    match config.get_string("input", "path") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        Some(_) => Err(AnalyzerError::ConfigInvalid {
            section: "input".to_string(),
            key: "path".to_string(),
            reason: "path must not be empty".to_string(),
        }),
        None => Ok(()),
    }
}

fn validate_profile(config: &dyn ConfigPort) -> Result<(), AnalyzerError> {
    if let Some(name) = config.get_string("filter", "profile") {
        if ProfileKind::parse(&name).is_none() {
            return Err(AnalyzerError::ConfigInvalid {
                section: "filter".to_string(),
                key: "profile".to_string(),
                reason: format!("unknown profile '{}' (expected standard or compact)", name),
            });
        }
    }
    Ok(())
}

fn positive(config: &dyn ConfigPort, section: &str, key: &str) -> Result<(), AnalyzerError> {
    if config.get_string(section, key).is_none() {
        return Ok(());
    }
    let value = config.get_double(section, key, f64::NAN);
    if value.is_nan() || value <= 0.0 {
        return Err(AnalyzerError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{} must be a positive number", key),
        });
    }
    Ok(())
}

fn validate_price_limits(config: &dyn ConfigPort) -> Result<(), AnalyzerError> {
    positive(config, "filter", "max_price")?;
    positive(config, "filter", "rent_price_cap")?;
    Ok(())
}

fn validate_ranking_size(config: &dyn ConfigPort) -> Result<(), AnalyzerError> {
    if config.get_string("ranking", "size").is_none() {
        return Ok(());
    }
    let value = config.get_int("ranking", "size", 0);
    if value < 1 {
        return Err(AnalyzerError::ConfigInvalid {
            section: "ranking".to_string(),
            key: "size".to_string(),
            reason: "size must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn validate_targets(config: &dyn ConfigPort) -> Result<(), AnalyzerError> {
    for key in ["target_cap_rate", "target_grm", "target_pe", "z_score_outlier"] {
        positive(config, "valuation", key)?;
    }
    Ok(())
}
