//! `warden lint`: static checks over a policies file.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use comfy_table::Cell;
use serde::Serialize;
use warden_abac::{LintFinding, PatternForms, Severity, lint_policies, pattern_forms};
use warden_config::WardenConfig;

use super::{OutputFormat, load_policies, print_json};
use crate::style::colors::SemanticStyle;
use crate::style::{print_allowed, print_section, print_warn, report_table};

#[derive(Debug, Args)]
pub struct LintArgs {
    /// Policies file (defaults to `sources.policies`).
    #[arg(long)]
    pub policies: Option<PathBuf>,

    /// Exit with failure when any warning is reported.
    #[arg(long)]
    pub strict: bool,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct LintOutput {
    policies: Vec<PatternForms>,
    findings: Vec<LintFinding>,
}

/// Returns false when `--strict` is set and a warning was found.
pub fn run(args: &LintArgs, config: &WardenConfig) -> Result<bool> {
    let path = args.policies.as_ref().unwrap_or(&config.sources.policies);
    let policies = load_policies(path)?;

    let output = LintOutput {
        policies: pattern_forms(&policies),
        findings: lint_policies(&policies),
    };
    let warnings = output
        .findings
        .iter()
        .filter(|f| f.severity == Severity::Warning)
        .count();

    match args.format {
        OutputFormat::Json => print_json(&output)?,
        OutputFormat::Text => print_output(&output, warnings),
    }

    Ok(!(args.strict && warnings > 0))
}

fn print_output(output: &LintOutput, warnings: usize) {
    println!("{}", "Policies (evaluation order)".header());
    let mut table = report_table(&["Id", "Name", "Priority", "Enabled", "Subject", "Resource", "Action"]);
    for forms in &output.policies {
        table.add_row(vec![
            Cell::new(forms.policy_id),
            Cell::new(&forms.policy_name),
            Cell::new(forms.priority),
            Cell::new(if forms.enabled { "yes" } else { "no" }),
            Cell::new(forms.subject),
            Cell::new(forms.resource),
            Cell::new(forms.action),
        ]);
    }
    println!("{table}");

    if output.findings.is_empty() {
        print_allowed("No findings");
        return;
    }

    print_section("Findings");
    for finding in &output.findings {
        let severity = match finding.severity {
            Severity::Warning => finding.severity.warning(),
            Severity::Info => finding.severity.muted(),
        };
        println!(
            "  {severity:<7} {} {}",
            format!("[{}] {}", finding.policy_id, finding.policy_name).code(),
            finding.message
        );
    }
    if warnings > 0 {
        print_warn(&format!("{warnings} warning(s)"));
    }
}
