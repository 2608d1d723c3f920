//! `warden coverage`: how much of the RBAC catalog ABAC already covers.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use comfy_table::Cell;
use warden_abac::InMemoryPolicyStore;
use warden_authz::{CoverageAnalyzer, CoverageReport};
use warden_config::WardenConfig;
use warden_rbac::InMemoryRoleStore;

use super::{OutputFormat, load_policies, load_role_catalog, print_json};
use crate::style::colors::SemanticStyle;
use crate::style::{info_table, print_allowed, print_section, print_warn, report_table};

#[derive(Debug, Args)]
pub struct CoverageArgs {
    /// Policies file (defaults to `sources.policies`).
    #[arg(long)]
    pub policies: Option<PathBuf>,

    /// Role catalog file (defaults to `sources.roles`).
    #[arg(long)]
    pub rbac: Option<PathBuf>,

    /// Fail when coverage is below this percentage.
    #[arg(long, value_name = "PERCENT")]
    pub fail_under: Option<f64>,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Returns false when `--fail-under` is set and not met.
pub fn run(args: &CoverageArgs, config: &WardenConfig) -> Result<bool> {
    let policies_path = args.policies.as_ref().unwrap_or(&config.sources.policies);
    let rbac_path = args.rbac.as_ref().unwrap_or(&config.sources.roles);

    let analyzer = CoverageAnalyzer::new(
        Arc::new(InMemoryPolicyStore::with_policies(load_policies(policies_path)?)),
        Arc::new(InMemoryRoleStore::from_catalog(load_role_catalog(rbac_path)?)),
    );
    let report = analyzer.get_coverage()?;

    match args.format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => print_report(&report),
    }

    Ok(args
        .fail_under
        .is_none_or(|threshold| report.coverage_percent >= threshold))
}

fn print_report(report: &CoverageReport) {
    println!("{}", "RBAC → ABAC coverage".header());
    println!(
        "{}",
        info_table(&[
            ("RBAC permissions", report.rbac_count.to_string()),
            ("ABAC policies", report.abac_count.to_string()),
            ("Enabled ABAC policies", report.enabled_abac_count.to_string()),
            ("Covered", report.covered_count().to_string()),
            ("Coverage", format!("{:.1}%", report.coverage_percent)),
        ])
    );

    if report.is_complete() {
        print_allowed("Every RBAC permission is covered by an enabled ABAC policy");
    } else {
        print_section("Missing policies");
        let mut table = report_table(&["Permission", "Resource", "Action", "Description"]);
        for missing in &report.missing_policies {
            table.add_row(vec![
                Cell::new(&missing.code),
                Cell::new(&missing.resource),
                Cell::new(&missing.action),
                Cell::new(missing.description.as_deref().unwrap_or("")),
            ]);
        }
        println!("{table}");
        print_warn(&format!(
            "{} permission(s) still depend on the RBAC fallback",
            report.missing_policies.len()
        ));
    }

    if !report.role_coverage.is_empty() {
        print_section("Roles");
        let mut table = report_table(&["Role", "Targeting policies", "Permissions"]);
        for role in &report.role_coverage {
            table.add_row(vec![
                Cell::new(&role.role),
                Cell::new(role.policy_count),
                Cell::new(role.permission_count),
            ]);
        }
        println!("{table}");
    }
}
