//! Configuration management commands.

use std::path::Path;

use anyhow::{Result, bail};
use clap::ValueEnum;
use warden_config::{Paths, WardenConfig};

use crate::style::colors::SemanticStyle;
use crate::style::{info_table, print_allowed, print_hint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    Text,
    Json,
    Toml,
}

/// Show the merged configuration.
pub fn show(project: &Path, config: &WardenConfig, format: ConfigFormat) -> Result<()> {
    match format {
        ConfigFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
        ConfigFormat::Toml => print!("{}", toml::to_string_pretty(config)?),
        ConfigFormat::Text => {
            println!("{}", "Warden configuration".header());
            println!(
                "{}",
                info_table(&[
                    ("authorization.abac_only", config.authorization.abac_only.to_string()),
                    (
                        "authorization.policy_cache_ttl_secs",
                        config.authorization.policy_cache_ttl_secs.to_string(),
                    ),
                    (
                        "authorization.condition_utc_offset_minutes",
                        config.authorization.condition_utc_offset_minutes.to_string(),
                    ),
                    ("sources.policies", config.sources.policies.display().to_string()),
                    ("sources.roles", config.sources.roles.display().to_string()),
                    ("logging.level", config.logging.level.clone()),
                ])
            );
            if !Paths::is_initialized(project) {
                print_hint(&format!(
                    "No warden.toml in {}; showing defaults plus overrides",
                    project.display()
                ));
            }
        }
    }
    Ok(())
}

/// Validate the configuration. Loading already validates, so this fails
/// only when the project has no `warden.toml`.
pub fn validate(project: &Path, config: &WardenConfig) -> Result<()> {
    if !Paths::is_initialized(project) {
        bail!("No warden.toml found in {}", project.display());
    }
    config.validate()?;
    print_allowed(&format!(
        "{} is valid",
        Paths::project_config_file(project).display().code()
    ));
    Ok(())
}
