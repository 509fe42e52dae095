//! CLI integration tests.
//!
//! Tests cover:
//! - Config resolution (build_analysis_config) with file values and overrides
//! - Pipeline orchestration with MockListingSource (run_pipeline)
//! - Console formatting of summaries, rankings, valuations and profiles
//! - End-to-end commands with real INI and CSV files on disk

mod common;

use clap::Parser;
use common::*;
use propanalyzer::adapters::csv_report_adapter::{LISTINGS_FILE, STATS_FILE};
use propanalyzer::adapters::file_config_adapter::FileConfigAdapter;
use propanalyzer::cli::{self, Cli, Overrides};
use propanalyzer::domain::analysis::AnalysisConfig;
use propanalyzer::domain::error::AnalyzerError;
use propanalyzer::domain::filter::{FilterProfile, ProfileKind};
use propanalyzer::domain::ranking;
use propanalyzer::domain::valuation::{compute_valuation, ValuationTargets};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn is_success(code: ExitCode) -> bool {
    format!("{code:?}") == format!("{:?}", ExitCode::SUCCESS)
}

fn same_code(code: ExitCode, expected: u8) -> bool {
    format!("{code:?}") == format!("{:?}", ExitCode::from(expected))
}

const VALID_INI: &str = r#"
[input]
path = listings.csv

[output]
directory = out

[filter]
profile = compact
max_price = 1500000
rent_price_cap = 20000

[ranking]
size = 10

[valuation]
target_cap_rate = 9.0
target_grm = 12.0
target_pe = 18.0
z_score_outlier = 3.0

[logging]
level = warn
ansi = false
"#;

mod config_loading {
    use super::*;

    #[test]
    fn build_analysis_config_full() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let config = cli::build_analysis_config(&adapter, &Overrides::default()).unwrap();

        assert_eq!(config.input, PathBuf::from("listings.csv"));
        assert_eq!(config.output_dir, Some(PathBuf::from("out")));
        assert_eq!(config.profile_kind, ProfileKind::Compact);
        assert_eq!(config.price_limits.max_price, 1_500_000.0);
        assert_eq!(config.price_limits.rent_price_cap, 20_000.0);
        assert_eq!(config.ranking_size, 10);
        assert_eq!(config.targets.cap_rate, 9.0);
        assert_eq!(config.targets.gross_rent_multiplier, 12.0);
        assert_eq!(config.targets.price_to_earnings_ratio, 18.0);
        assert_eq!(config.targets.z_score_outlier, 3.0);
    }

    #[test]
    fn build_analysis_config_uses_defaults() {
        let adapter = FileConfigAdapter::from_string("[input]\npath = data.csv\n").unwrap();
        let config = cli::build_analysis_config(&adapter, &Overrides::default()).unwrap();

        let expected = AnalysisConfig::new(PathBuf::from("data.csv"));
        assert_eq!(config, expected);
        assert_eq!(config.ranking_size, 15);
        assert_eq!(config.targets, ValuationTargets::default());
    }

    #[test]
    fn overrides_take_precedence() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let overrides = Overrides {
            input: Some(PathBuf::from("other.csv")),
            profile: Some("standard".into()),
            output: Some(PathBuf::from("elsewhere")),
        };
        let config = cli::build_analysis_config(&adapter, &overrides).unwrap();

        assert_eq!(config.input, PathBuf::from("other.csv"));
        assert_eq!(config.profile_kind, ProfileKind::Standard);
        assert_eq!(config.output_dir, Some(PathBuf::from("elsewhere")));
    }

    #[test]
    fn missing_input_without_override() {
        let adapter = FileConfigAdapter::from_string("[filter]\nprofile = standard\n").unwrap();
        let err = cli::build_analysis_config(&adapter, &Overrides::default()).unwrap_err();
        assert!(matches!(err, AnalyzerError::ConfigMissing { key, .. } if key == "path"));

        let overrides = Overrides {
            input: Some(PathBuf::from("x.csv")),
            ..Overrides::default()
        };
        assert!(cli::build_analysis_config(&adapter, &overrides).is_ok());
    }

    #[test]
    fn zero_ranking_size_is_rejected() {
        let adapter =
            FileConfigAdapter::from_string("[input]\npath = a.csv\n[ranking]\nsize = 0\n").unwrap();
        let err = cli::build_analysis_config(&adapter, &Overrides::default()).unwrap_err();
        assert!(matches!(err, AnalyzerError::ConfigInvalid { key, .. } if key == "size"));
    }

    #[test]
    fn invalid_file_values_fail_before_resolution() {
        let adapter =
            FileConfigAdapter::from_string("[input]\npath = a.csv\n[valuation]\ntarget_grm = -3\n")
                .unwrap();
        let err = cli::build_analysis_config(&adapter, &Overrides::default()).unwrap_err();
        assert!(matches!(err, AnalyzerError::ConfigInvalid { key, .. } if key == "target_grm"));
    }

    #[test]
    fn unknown_profile_override() {
        let adapter = FileConfigAdapter::from_string("[input]\npath = a.csv\n").unwrap();
        let overrides = Overrides {
            profile: Some("strict".into()),
            ..Overrides::default()
        };
        let err = cli::build_analysis_config(&adapter, &overrides).unwrap_err();
        assert!(matches!(err, AnalyzerError::ConfigInvalid { key, .. } if key == "profile"));
    }
}

mod pipeline_mock {
    use super::*;

    fn config() -> AnalysisConfig {
        AnalysisConfig::new(PathBuf::from("unused.csv"))
    }

    #[test]
    fn run_pipeline_with_mock_source() {
        let source = MockListingSource::new().with_rows(sample_market());
        let result = cli::run_pipeline(&source, &config()).unwrap();
        assert_eq!(result.listings.len(), 7);
        assert_eq!(result.stats.len(), 2);
    }

    #[test]
    fn run_pipeline_uses_configured_profile() {
        let source = MockListingSource::new().with_rows(sample_market());
        let mut config = config();
        config.profile_kind = ProfileKind::Compact;
        let result = cli::run_pipeline(&source, &config).unwrap();
        assert_eq!(result.filter_report.profile, "compact");
        assert_eq!(result.listings.len(), 6);
    }

    #[test]
    fn run_pipeline_propagates_ingest_errors() {
        let source = MockListingSource::new().with_error("truncated file");
        let err = cli::run_pipeline(&source, &config()).unwrap_err();
        assert!(matches!(err, AnalyzerError::Ingest { reason, .. } if reason == "truncated file"));
    }
}

mod formatting {
    use super::*;

    #[test]
    fn summary_lists_nonzero_rules() {
        let source = MockListingSource::new().with_rows(sample_market());
        let result = cli::run_pipeline(&source, &AnalysisConfig::new(PathBuf::new())).unwrap();
        let summary = cli::format_summary(&result);

        assert!(summary.contains("Listings read:    13"));
        assert!(summary.contains("Listings kept:    7"));
        assert!(summary.contains("price == 0"));
        assert!(summary.contains("Areas with stats: 2"));
    }

    #[test]
    fn ranking_table_contains_rows() {
        let source = MockListingSource::new().with_rows(sample_market());
        let result = cli::run_pipeline(&source, &AnalysisConfig::new(PathBuf::new())).unwrap();
        let text = cli::format_ranking(&ranking::top_mean(&result.stats, 15));

        assert!(text.starts_with("=== Top 2 Areas by Mean Rent per m2 ==="));
        assert!(text.contains("mean rent per m2"));
        assert!(text.contains("De Velde"));
        assert!(text.contains("150.00"));
    }

    #[test]
    fn valuation_report_contains_metrics_and_signals() {
        let source = MockListingSource::new().with_rows(sample_market());
        let result = cli::run_pipeline(&source, &AnalysisConfig::new(PathBuf::new())).unwrap();
        let valuation = compute_valuation("De Velde", 1_750_000.0, 82.0, &result.stats).unwrap();
        let text = cli::format_valuation(&valuation, &ValuationTargets::default());

        assert!(text.contains("Monthly Gross Rent Income:        12300.00"));
        assert!(text.contains("Annual Gross Rent Income:         147600.00"));
        assert!(text.contains("Capitalization Rate:              8.43%"));
        assert!(text.contains("Gross Rent Multiplier:            11.86"));
        assert!(text.contains("=== Signals ==="));
    }

    #[test]
    fn profile_listing_names_rules() {
        let text = cli::format_profile(&FilterProfile::compact());
        assert!(text.starts_with("compact:"));
        assert!(text.contains("listing_type IN [Other, House]"));
        assert!(text.contains("size_above"));
        assert!(text.contains("price_cap"));
        assert!(text.contains("price > 25000 (any sale_rent)"));
    }
}

mod end_to_end {
    use super::*;
    use tempfile::TempDir;

    fn setup(dir: &Path) -> PathBuf {
        let input = dir.join("listings.csv");
        fs::write(&input, to_csv(&sample_market())).unwrap();
        let out = dir.join("out");
        let ini = format!(
            "[input]\npath = {}\n\n[output]\ndirectory = {}\n\n[logging]\nlevel = warn\nansi = false\n",
            input.display(),
            out.display()
        );
        let config = dir.join("propanalyzer.ini");
        fs::write(&config, ini).unwrap();
        config
    }

    #[test]
    fn analyze_writes_artifacts() {
        let dir = TempDir::new().unwrap();
        let config = setup(dir.path());
        let cli = Cli::parse_from(["propanalyzer", "analyze", "-c", config.to_str().unwrap()]);

        assert!(is_success(cli::run(cli)));
        assert!(dir.path().join("out").join(LISTINGS_FILE).exists());
        assert!(dir.path().join("out").join(STATS_FILE).exists());
    }

    #[test]
    fn value_known_area_succeeds() {
        let dir = TempDir::new().unwrap();
        let config = setup(dir.path());
        let cli = Cli::parse_from([
            "propanalyzer",
            "value",
            "-c",
            config.to_str().unwrap(),
            "--title",
            "De Velde",
            "--price",
            "1750000",
            "--floor-size",
            "82",
        ]);
        assert!(is_success(cli::run(cli)));
    }

    #[test]
    fn value_unknown_area_fails_with_valuation_code() {
        let dir = TempDir::new().unwrap();
        let config = setup(dir.path());
        let cli = Cli::parse_from([
            "propanalyzer",
            "value",
            "-c",
            config.to_str().unwrap(),
            "--title",
            "Atlantis",
            "--price",
            "1000000",
            "--floor-size",
            "50",
        ]);
        assert!(same_code(cli::run(cli), 5));
    }

    #[test]
    fn analyze_missing_input_file_fails_with_ingest_code() {
        let dir = TempDir::new().unwrap();
        let config = setup(dir.path());
        let cli = Cli::parse_from([
            "propanalyzer",
            "analyze",
            "-c",
            config.to_str().unwrap(),
            "--input",
            "/nonexistent/listings.csv",
        ]);
        assert!(same_code(cli::run(cli), 3));
    }

    #[test]
    fn validate_reports_config_errors() {
        let file = write_temp_ini("[input]\npath = a.csv\n[ranking]\nsize = 0\n");
        let cli = Cli::parse_from(["propanalyzer", "validate", "-c", file.path().to_str().unwrap()]);
        assert!(same_code(cli::run(cli), 2));

        let file = write_temp_ini(VALID_INI);
        let cli = Cli::parse_from(["propanalyzer", "validate", "-c", file.path().to_str().unwrap()]);
        assert!(is_success(cli::run(cli)));
    }

    #[test]
    fn missing_config_file_fails() {
        let cli = Cli::parse_from(["propanalyzer", "validate", "-c", "/nonexistent/config.ini"]);
        assert!(same_code(cli::run(cli), 2));
    }

    #[test]
    fn profiles_command_succeeds() {
        let cli = Cli::parse_from(["propanalyzer", "profiles"]);
        assert!(is_success(cli::run(cli)));
    }
}
