//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvListingAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::analysis::{run_analysis, AnalysisConfig, AnalysisResult};
use crate::domain::config_validation::validate_analysis_config;
use crate::domain::error::AnalyzerError;
use crate::domain::filter::{FilterProfile, PriceLimits, ProfileKind};
use crate::domain::ranking::{standard_views, RankingView, DEFAULT_RANKING_SIZE};
use crate::domain::valuation::{compute_valuation, ValuationResult, ValuationTargets};
use crate::ports::config_port::ConfigPort;
use crate::ports::listing_port::ListingSource;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "propanalyzer", about = "Rental-market statistics and property valuation")]
pub struct Cli {
    /// Log at debug level regardless of configuration
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Clean listings, aggregate area rent statistics and print rankings
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(short, long)]
        profile: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Value a property against its area's rent statistics
    Value {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(short, long)]
        profile: Option<String>,
        #[arg(long)]
        title: String,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        floor_size: f64,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List the built-in filter profiles
    Profiles,
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub input: Option<PathBuf>,
    pub profile: Option<String>,
    pub output: Option<PathBuf>,
}

pub fn run(cli: Cli) -> ExitCode {
    let verbose = cli.verbose;
    match cli.command {
        Command::Analyze {
            config,
            input,
            profile,
            output,
        } => run_analyze(
            &config,
            &Overrides {
                input,
                profile,
                output,
            },
            verbose,
        ),
        Command::Value {
            config,
            input,
            profile,
            title,
            price,
            floor_size,
        } => run_value(
            &config,
            &Overrides {
                input,
                profile,
                output: None,
            },
            &title,
            price,
            floor_size,
            verbose,
        ),
        Command::Validate { config } => run_validate(&config),
        Command::Profiles => run_profiles(),
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over `level`.
pub fn init_logging(level: &str, ansi: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .with_target(false)
        .try_init();
}

fn init_logging_from(config: &dyn ConfigPort, verbose: bool) {
    let level = if verbose {
        "debug".to_string()
    } else {
        config
            .get_string("logging", "level")
            .unwrap_or_else(|| "info".to_string())
    };
    init_logging(&level, config.get_bool("logging", "ansi", true));
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Validate `adapter` and resolve it, with `overrides` taking precedence,
/// into an explicit analysis configuration.
pub fn build_analysis_config(
    adapter: &dyn ConfigPort,
    overrides: &Overrides,
) -> Result<AnalysisConfig, AnalyzerError> {
    validate_analysis_config(adapter)?;

    let input = overrides
        .input
        .clone()
        .or_else(|| adapter.get_path("input", "path"))
        .ok_or_else(|| AnalyzerError::ConfigMissing {
            section: "input".into(),
            key: "path".into(),
        })?;

    let profile_name = overrides
        .profile
        .clone()
        .or_else(|| adapter.get_string("filter", "profile"))
        .unwrap_or_else(|| ProfileKind::Standard.as_str().to_string());
    let profile_kind =
        ProfileKind::parse(&profile_name).ok_or_else(|| AnalyzerError::ConfigInvalid {
            section: "filter".into(),
            key: "profile".into(),
            reason: format!("unknown profile '{}'", profile_name),
        })?;

    let defaults = PriceLimits::default();
    let price_limits = PriceLimits {
        max_price: adapter.get_double("filter", "max_price", defaults.max_price),
        rent_price_cap: adapter.get_double("filter", "rent_price_cap", defaults.rent_price_cap),
    };

    let ranking_size = adapter.get_int("ranking", "size", DEFAULT_RANKING_SIZE as i64);

    let default_targets = ValuationTargets::default();
    let targets = ValuationTargets {
        cap_rate: adapter.get_double("valuation", "target_cap_rate", default_targets.cap_rate),
        gross_rent_multiplier: adapter.get_double(
            "valuation",
            "target_grm",
            default_targets.gross_rent_multiplier,
        ),
        price_to_earnings_ratio: adapter.get_double(
            "valuation",
            "target_pe",
            default_targets.price_to_earnings_ratio,
        ),
        z_score_outlier: adapter.get_double(
            "valuation",
            "z_score_outlier",
            default_targets.z_score_outlier,
        ),
    };

    Ok(AnalysisConfig {
        input,
        output_dir: overrides
            .output
            .clone()
            .or_else(|| adapter.get_path("output", "directory")),
        profile_kind,
        price_limits,
        ranking_size: ranking_size as usize,
        targets,
    })
}

/// Fetch listings from `source` and run the full analysis.
pub fn run_pipeline(
    source: &dyn ListingSource,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, AnalyzerError> {
    let raw = source.fetch_listings()?;
    Ok(run_analysis(&raw, &config.profile()))
}

/// Load, validate and resolve the configuration, then install logging.
fn prepare(
    config_path: &Path,
    overrides: &Overrides,
    verbose: bool,
) -> Result<AnalysisConfig, ExitCode> {
    let adapter = load_config(config_path)?;

    let resolved = build_analysis_config(&adapter, overrides).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })?;

    init_logging_from(&adapter, verbose);
    info!(config = %config_path.display(), "loaded config");
    Ok(resolved)
}

fn run_analyze(config_path: &Path, overrides: &Overrides, verbose: bool) -> ExitCode {
    let config = match prepare(config_path, overrides, verbose) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let source = CsvListingAdapter::new(config.input.clone());
    let result = match run_pipeline(&source, &config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    println!("{}", format_summary(&result));
    for view in standard_views(&result.stats, config.ranking_size) {
        println!("{}", format_ranking(&view));
    }

    if let Some(dir) = &config.output_dir {
        if let Err(e) = CsvReportAdapter.write(&result, dir) {
            eprintln!("error: {e}");
            return (&e).into();
        }
        eprintln!("Artifacts written to: {}", dir.display());
    }

    ExitCode::SUCCESS
}

fn run_value(
    config_path: &Path,
    overrides: &Overrides,
    title: &str,
    price: f64,
    floor_size: f64,
    verbose: bool,
) -> ExitCode {
    let config = match prepare(config_path, overrides, verbose) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let source = CsvListingAdapter::new(config.input.clone());
    let result = match run_pipeline(&source, &config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match compute_valuation(title, price, floor_size, &result.stats) {
        Ok(valuation) => {
            println!("{}", format_valuation(&valuation, &config.targets));
            ExitCode::SUCCESS
        }
        Err(e) => {
            let err = AnalyzerError::from(e);
            eprintln!("error: {err}");
            (&err).into()
        }
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let config = match build_analysis_config(&adapter, &Overrides::default()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("  input:        {}", config.input.display());
    match &config.output_dir {
        Some(dir) => eprintln!("  output:       {}", dir.display()),
        None => eprintln!("  output:       (none)"),
    }
    eprintln!("  profile:      {}", config.profile_kind.as_str());
    eprintln!("  ranking size: {}", config.ranking_size);
    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_profiles() -> ExitCode {
    for kind in ProfileKind::ALL {
        println!("{}", format_profile(&FilterProfile::from_kind(kind, PriceLimits::default())));
    }
    ExitCode::SUCCESS
}

pub fn format_profile(profile: &FilterProfile) -> String {
    let mut out = format!("{}:\n", profile.name);
    for rule in &profile.rules {
        let _ = writeln!(out, "  - {:<22} {}", rule.name(), rule);
    }
    out
}

pub fn format_summary(result: &AnalysisResult) -> String {
    let report = &result.filter_report;
    let mut out = String::from("=== Cleaning Summary ===\n");
    let _ = writeln!(out, "Profile:          {}", report.profile);
    let _ = writeln!(out, "Listings read:    {}", report.input);
    let _ = writeln!(out, "Listings kept:    {}", report.kept);
    for (rule, count) in report.removed_by_rule.iter().filter(|(_, c)| *c > 0) {
        let _ = writeln!(out, "  removed {:>6}  {}", count, rule);
    }
    let _ = writeln!(out, "Areas with stats: {}", result.stats.len());
    out
}

pub fn format_ranking(view: &RankingView) -> String {
    let mut out = format!("=== {} ===\n", view.title());
    if view.rows.is_empty() {
        out.push_str("  (no areas)\n");
        return out;
    }
    let _ = writeln!(
        out,
        "  {:<32} {:>20} {:>8}",
        "title",
        view.metric.column_name(),
        "rentals"
    );
    for row in &view.rows {
        let _ = writeln!(
            out,
            "  {:<32} {:>20.2} {:>8}",
            row.title, row.value, row.rental_count
        );
    }
    out
}

pub fn format_valuation(valuation: &ValuationResult, targets: &ValuationTargets) -> String {
    let income = &valuation.income;
    let signals = valuation.signals(targets);
    let mark = |ok: bool| if ok { "yes" } else { "no" };

    let mut out = format!(
        "=== Valuation: {} at {:.2} for {} m2 ===\n",
        valuation.title, valuation.price, valuation.floor_size
    );
    let _ = writeln!(
        out,
        "Monthly Gross Rent Income:        {:.2} (stddev {:.2})",
        income.monthly_gross_rent_income, income.stddev_monthly_gross_rent_income
    );
    let _ = writeln!(
        out,
        "Annual Gross Rent Income:         {:.2} (stddev {:.2})",
        income.annual_gross_rent_income, income.stddev_annual_gross_rent_income
    );
    let _ = writeln!(
        out,
        "Capitalization Rate:              {:.2}% (stddev {:.2}%)",
        income.cap_rate, income.stddev_cap_rate
    );
    let _ = writeln!(
        out,
        "Gross Rent Multiplier:            {:.2}",
        valuation.gross_rent_multiplier
    );
    let _ = writeln!(
        out,
        "Price to Earnings Ratio:          {:.2}",
        valuation.price_to_earnings_ratio
    );
    let _ = writeln!(out, "Z-Score:                          {:.2}", valuation.z_score);
    out.push_str("\n=== Signals ===\n");
    let _ = writeln!(
        out,
        "Cap rate above {:.1}%:             {}",
        targets.cap_rate,
        mark(signals.cap_rate_above_target)
    );
    let _ = writeln!(
        out,
        "GRM below {:.1}:                  {}",
        targets.gross_rent_multiplier,
        mark(signals.grm_below_target)
    );
    let _ = writeln!(
        out,
        "P/E below {:.1}:                  {}",
        targets.price_to_earnings_ratio,
        mark(signals.pe_below_target)
    );
    let _ = writeln!(
        out,
        "Z-score outlier (|z| > {:.1}):     {}",
        targets.z_score_outlier,
        mark(signals.z_score_outlier)
    );
    out
}
