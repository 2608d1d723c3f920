//! CLI command implementations.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::de::DeserializeOwned;
use tracing::warn;
use warden_abac::{Policy, RequesterAttributes};
use warden_rbac::RoleCatalog;

pub mod check;
pub mod config;
pub mod coverage;
pub mod lint;
pub mod version;

/// How a command renders its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables and messages.
    Text,
    /// Pretty-printed JSON on stdout.
    Json,
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {what} from {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {what} in {}", path.display()))
}

/// A JSON array of policies.
pub fn load_policies(path: &Path) -> Result<Vec<Policy>> {
    read_json(path, "policies")
}

pub fn load_requester(path: &Path) -> Result<RequesterAttributes> {
    read_json(path, "requester")
}

pub fn load_role_catalog(path: &Path) -> Result<RoleCatalog> {
    read_json(path, "role catalog")
}

/// Like [`load_role_catalog`], but a missing file yields an empty catalog.
pub fn load_role_catalog_or_empty(path: &Path) -> Result<RoleCatalog> {
    if path.exists() {
        return load_role_catalog(path);
    }
    warn!(path = %path.display(), "Role catalog not found; RBAC fallback has no roles");
    Ok(RoleCatalog::default())
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
