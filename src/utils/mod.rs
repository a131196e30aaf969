use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

use crate::builders::reporter::{ConsoleReporter, JsonReporter, StatusReporter};
use crate::core::config::{ConfigFormat, ConfigManager, ConfigProvider, FailurePolicy};
use crate::core::engine::{RunSummary, StripEngine};

/// Output format of the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Command-line overrides applied on top of the loaded configuration.
#[derive(Debug, Default, Clone)]
pub struct RunOptions {
    pub roots: Vec<PathBuf>,
    pub ignored: Vec<String>,
    pub dry_run: bool,
    pub failure_policy: Option<FailurePolicy>,
    pub format: ReportFormat,
    pub verbose: bool,
}

/// Writes the default configuration file unless one already exists.
///
/// # Arguments
/// * `config_manager`: Points at the configuration file to create.
pub fn initialize_config(config_manager: &ConfigManager) -> Result<()> {
    let path = config_manager.get_config_path().display();
    if config_manager.initialize()? {
        println!("✓ Wrote default configuration to {path}");
    } else {
        println!("ℹ️  {path} already exists, leaving it untouched");
    }
    Ok(())
}

/// Prints every configuration issue found by the standard validator.
///
/// # Returns
/// `Ok(())` for a clean configuration, an error when any issue was reported.
pub fn validate_config(config_manager: &ConfigManager) -> Result<()> {
    let issues = config_manager.validate_config()?;

    if issues.is_empty() {
        println!("✓ Configuration is valid.");
        Ok(())
    } else {
        println!("⚠️  Found issues in configuration:");
        for issue in issues {
            println!("  - {issue}");
        }
        anyhow::bail!("Configuration validation failed.");
    }
}

/// Prints the effective configuration (defaults included) in `format`.
pub fn show_config(config_manager: &ConfigManager, format: ConfigFormat) -> Result<()> {
    print!("{}", config_manager.export_config(format)?);
    Ok(())
}

/// Chooses the default log filter: `debug` when either `--verbose` or the
/// config's `verbose` setting asks for it, `info` otherwise.
///
/// A configuration that cannot be loaded falls back to the flag alone; the
/// command itself reports the load error afterwards.
///
/// # Arguments
/// * `verbose_flag`: Value of the global `--verbose` flag.
/// * `config_manager`: Source of the `global_settings.verbose` value.
pub fn log_level(verbose_flag: bool, config_manager: &ConfigManager) -> &'static str {
    let configured = config_manager
        .load_config()
        .map(|config| config.global_settings.verbose)
        .unwrap_or(false);

    if verbose_flag || configured { "debug" } else { "info" }
}

/// Runs the stripper with the configuration merged with `options`, prints
/// the report, and fails if any file could not be processed.
pub fn run_strip(config_manager: &ConfigManager, options: RunOptions) -> Result<RunSummary> {
    let mut config = config_manager.load_config()?;

    if !options.roots.is_empty() {
        config.roots = options.roots;
    }
    if !options.ignored.is_empty() {
        config.ignored = options.ignored;
    }
    if let Some(policy) = options.failure_policy {
        config.global_settings.failure_policy = policy;
    }
    config.global_settings.dry_run |= options.dry_run;
    let verbose = options.verbose || config.global_settings.verbose;

    let engine = StripEngine::from_config(&config)?;
    info!(
        "Ignoring files named: {}",
        engine.ignored().sorted_names().join(", ")
    );

    let summary = engine.process_directories(&config.roots);

    let reporter: Box<dyn StatusReporter> = match options.format {
        ReportFormat::Text => Box::new(ConsoleReporter::new(verbose)),
        ReportFormat::Json => Box::new(JsonReporter),
    };
    reporter.report(&summary)?;

    if summary.has_failures() {
        anyhow::bail!("{} file(s) could not be processed", summary.failures.len());
    }

    Ok(summary)
}
