//! Domain error types.

use crate::domain::valuation::ValuationError;

/// Top-level error type for propanalyzer.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("failed to ingest listings from {source_name}: {reason}")]
    Ingest { source_name: String, reason: String },

    #[error("failed to write report: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Valuation(#[from] ValuationError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&AnalyzerError> for std::process::ExitCode {
    fn from(err: &AnalyzerError) -> Self {
        let code: u8 = match err {
            AnalyzerError::Io(_) => 1,
            AnalyzerError::ConfigParse { .. }
            | AnalyzerError::ConfigMissing { .. }
            | AnalyzerError::ConfigInvalid { .. } => 2,
            AnalyzerError::Ingest { .. } => 3,
            AnalyzerError::Report { .. } => 4,
            AnalyzerError::Valuation(_) => 5,
        };
        std::process::ExitCode::from(code)
    }
}
