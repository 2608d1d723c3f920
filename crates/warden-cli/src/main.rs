//! Warden CLI.
//!
//! Evaluates ABAC policies with a legacy RBAC fallback against JSON
//! fixture files, and reports how far the policy set has replaced RBAC.
//!
//! # Quick Start
//!
//! ```bash
//! # Decide one request
//! warden check user:profile read --id u1 --role user --policies policies.json
//!
//! # How many RBAC permissions still lack an ABAC policy?
//! warden coverage --policies policies.json --rbac roles.json
//!
//! # Static checks over the policy set
//! warden lint --policies policies.json
//! ```
//!
//! Exit codes: 0 on success or grant, 1 on denial or a failed threshold,
//! 2 on errors.

mod commands;
mod style;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use warden_config::{ConfigLoader, WardenConfig};

use commands::check::CheckArgs;
use commands::config::ConfigFormat;
use commands::coverage::CoverageArgs;
use commands::lint::LintArgs;

/// Warden - attribute-based access control with an RBAC fallback.
#[derive(Parser)]
#[command(name = "warden")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project directory holding warden.toml.
    #[arg(short, long, global = true, default_value = ".")]
    project: PathBuf,

    /// Disable colored output (also honors `NO_COLOR`).
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version information.
    Version,

    /// Decide whether a requester may perform an action on a resource.
    Check(CheckArgs),

    /// Report RBAC permissions not yet covered by ABAC policies.
    Coverage(CoverageArgs),

    /// Static checks over a policy set.
    Lint(LintArgs),

    /// Configuration management.
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the merged configuration.
    Show {
        #[arg(short, long, value_enum, default_value = "text")]
        format: ConfigFormat,
    },

    /// Validate warden.toml.
    Validate,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    style::set_no_color(cli.no_color || std::env::var_os("NO_COLOR").is_some());

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            style::print_error(&format!("{err:#}"));
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    if matches!(cli.command, Commands::Version) {
        commands::version::run();
        return Ok(ExitCode::SUCCESS);
    }

    let config = ConfigLoader::new().with_project_dir(&cli.project).load()?;
    init_logging(&config);

    let passed = match &cli.command {
        Commands::Version => true,
        Commands::Check(args) => commands::check::run(args, &config)?,
        Commands::Coverage(args) => commands::coverage::run(args, &config)?,
        Commands::Lint(args) => commands::lint::run(args, &config)?,
        Commands::Config(ConfigCommands::Show { format }) => {
            commands::config::show(&cli.project, &config, *format)?;
            true
        }
        Commands::Config(ConfigCommands::Validate) => {
            commands::config::validate(&cli.project, &config)?;
            true
        }
    };

    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// `RUST_LOG` wins over `logging.level`. Logs go to stderr so JSON output
/// stays parseable.
fn init_logging(config: &WardenConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
