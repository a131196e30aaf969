/// Strips the Functional Source License header block that the header tooling
/// stamped on top of every file, walking `cmd`, `internal` and `deploy` by
/// default. Files such as README.md or LICENSE are never touched.
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use copyright_strip::core::config::{ConfigFormat, ConfigManager, FailurePolicy};
use copyright_strip::utils::{self, ReportFormat, RunOptions};

#[derive(Parser)]
#[command(name = "copyright-strip", version)]
#[command(about = "Remove the leading copyright block from source files")]
struct Cli {
    /// Print every stripped file and debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to ./copyright-strip.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init,
    /// Strip copyright blocks below the given roots
    Run {
        /// Root directories to walk (defaults to the configured roots)
        roots: Vec<PathBuf>,
        /// File base name to leave untouched; repeat for several names
        #[arg(short, long = "ignore", value_name = "NAME")]
        ignored: Vec<String>,
        /// Report what would be stripped without writing any file
        #[arg(long)]
        dry_run: bool,
        /// What to do when a file cannot be read or written
        #[arg(long, value_enum, value_name = "POLICY")]
        on_error: Option<FailurePolicy>,
        /// Report format
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
    /// Check the configuration for problems
    Validate,
    /// Print the effective configuration
    ShowConfig {
        #[arg(long, value_enum, default_value_t = ConfigFormat::Toml)]
        format: ConfigFormat,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };

    let default_level = utils::log_level(cli.verbose, &config_manager);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init => utils::initialize_config(&config_manager),
        Commands::Run {
            roots,
            ignored,
            dry_run,
            on_error,
            format,
        } => {
            let options = RunOptions {
                roots,
                ignored,
                dry_run,
                failure_policy: on_error,
                format,
                verbose: cli.verbose,
            };
            utils::run_strip(&config_manager, options).map(|_| ())
        }
        Commands::Validate => utils::validate_config(&config_manager),
        Commands::ShowConfig { format } => utils::show_config(&config_manager, format),
    }
}
