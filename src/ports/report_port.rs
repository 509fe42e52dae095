//! Report output port trait.

use crate::domain::analysis::AnalysisResult;
use crate::domain::error::AnalyzerError;
use std::path::Path;

/// Port for writing the analysis artifacts.
pub trait ReportPort {
    fn write(&self, result: &AnalysisResult, output_dir: &Path) -> Result<(), AnalyzerError>;
}
