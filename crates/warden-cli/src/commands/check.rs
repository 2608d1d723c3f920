//! `warden check`: one authorization decision over fixture files.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, FixedOffset, Utc};
use clap::Args;
use serde::Serialize;
use warden_abac::{Evaluator, InMemoryPolicyStore, PolicyCache, RequesterAttributes};
use warden_authz::{AuthorizationGate, DecisionPath, GateDecision};
use warden_config::WardenConfig;
use warden_rbac::{InMemoryRoleStore, RbacChecker};
use warden_types::{ManualClock, RequesterStatus};

use super::{OutputFormat, load_policies, load_requester, load_role_catalog_or_empty, print_json};
use crate::style::colors::SemanticStyle;
use crate::style::{print_allowed, print_denied, print_hint, print_labeled};

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Resource being accessed, e.g. `user:profile`.
    pub resource: String,

    /// Action being performed, e.g. `read`.
    pub action: String,

    /// JSON file with the requester's attributes.
    #[arg(long, conflicts_with_all = ["id", "username", "roles", "departments", "email", "status"])]
    pub requester: Option<PathBuf>,

    /// Requester id.
    #[arg(long)]
    pub id: Option<String>,

    /// Requester username.
    #[arg(long)]
    pub username: Option<String>,

    /// Role held by the requester (repeatable).
    #[arg(long = "role")]
    pub roles: Vec<String>,

    /// Department of the requester (repeatable).
    #[arg(long = "department")]
    pub departments: Vec<String>,

    #[arg(long)]
    pub email: Option<String>,

    /// ACTIVE, INACTIVE, or LOCKED.
    #[arg(long)]
    pub status: Option<RequesterStatus>,

    /// Policies file (defaults to `sources.policies`).
    #[arg(long)]
    pub policies: Option<PathBuf>,

    /// Role catalog file (defaults to `sources.roles`).
    #[arg(long)]
    pub rbac: Option<PathBuf>,

    /// Make ABAC denials final regardless of configuration.
    #[arg(long)]
    pub abac_only: bool,

    /// Evaluate as of this RFC 3339 instant instead of now.
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl CheckArgs {
    fn requester(&self) -> Result<RequesterAttributes> {
        if let Some(path) = &self.requester {
            return load_requester(path);
        }

        let mut requester = RequesterAttributes::new(
            self.id.clone().unwrap_or_default(),
            self.username.clone().unwrap_or_default(),
        );
        requester.roles.extend(self.roles.iter().cloned());
        requester.departments.extend(self.departments.iter().cloned());
        requester.email.clone_from(&self.email);
        requester.status = self.status.unwrap_or_default();
        Ok(requester)
    }
}

#[derive(Serialize)]
struct CheckOutput<'a> {
    resource: &'a str,
    action: &'a str,
    requester: &'a str,
    evaluated_at: DateTime<Utc>,
    abac_only: bool,
    #[serde(flatten)]
    decision: &'a GateDecision,
}

/// Returns whether access was granted.
pub fn run(args: &CheckArgs, config: &WardenConfig) -> Result<bool> {
    let requester = args.requester()?;
    requester
        .validate_identity()
        .context("Pass --id, --username, or a --requester file")?;

    let policies_path = args.policies.as_ref().unwrap_or(&config.sources.policies);
    let rbac_path = args.rbac.as_ref().unwrap_or(&config.sources.roles);
    let policies = load_policies(policies_path)?;
    let catalog = load_role_catalog_or_empty(rbac_path)?;

    let evaluated_at = args.at.unwrap_or_else(Utc::now);
    let ttl = Duration::from_std(config.authorization.policy_cache_ttl())
        .context("policy_cache_ttl_secs is out of range")?;
    let offset = FixedOffset::east_opt(config.authorization.condition_utc_offset_secs())
        .context("condition_utc_offset_minutes is out of range")?;

    let cache = PolicyCache::with_clock(
        Arc::new(InMemoryPolicyStore::with_policies(policies)),
        Arc::new(ManualClock::new(evaluated_at)),
        ttl,
    );
    let abac_only = args.abac_only || config.authorization.abac_only;
    let gate = AuthorizationGate::new(
        Evaluator::new(Arc::new(cache)).with_utc_offset(offset),
        RbacChecker::new(Arc::new(InMemoryRoleStore::from_catalog(catalog))),
    )
    .with_abac_only(abac_only);

    let decision = gate.authorize(&requester, &args.resource, &args.action)?;

    match args.format {
        OutputFormat::Json => print_json(&CheckOutput {
            resource: &args.resource,
            action: &args.action,
            requester: requester.display_name(),
            evaluated_at,
            abac_only,
            decision: &decision,
        })?,
        OutputFormat::Text => print_decision(&requester, args, &decision),
    }

    Ok(decision.allowed)
}

fn print_decision(requester: &RequesterAttributes, args: &CheckArgs, decision: &GateDecision) {
    let request = format!(
        "{} → {} on {}",
        requester.display_name(),
        args.action.code(),
        args.resource.code()
    );
    if decision.allowed {
        print_allowed(&format!("ALLOWED  {request}"));
    } else {
        print_denied(&format!("DENIED   {request}"));
    }

    let path = match decision.path {
        DecisionPath::Abac => "ABAC",
        DecisionPath::RbacFallback => "RBAC fallback",
        DecisionPath::Denied => "denied",
    };
    print_labeled("Path", path);
    if !decision.matched_policies.is_empty() {
        print_labeled("Policies", &decision.matched_policies.join(", "));
    }
    print_labeled("Reason", &decision.reason);
    if let Some(remediation) = &decision.remediation {
        print_hint(remediation);
    }
}
