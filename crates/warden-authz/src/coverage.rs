//! RBAC → ABAC migration coverage.
//!
//! For every catalogued RBAC permission, checks whether some enabled ABAC
//! policy covers the same resource and action. Subjects and effects are not
//! compared: a permission counts as covered once ABAC has any enabled rule
//! for it.

use std::sync::Arc;

use serde::Serialize;
use warden_abac::matcher::{match_action, match_resource};
use warden_abac::{ActionPattern, Policy, PolicyStore, ResourcePattern};
use warden_rbac::{Permission, Role, RoleStore};

use crate::error::Result;

/// An RBAC permission with no covering ABAC policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingPolicy {
    pub code: String,
    pub resource: String,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&Permission> for MissingPolicy {
    fn from(permission: &Permission) -> Self {
        Self {
            code: permission.code(),
            resource: permission.resource.clone(),
            action: permission.action.clone(),
            description: permission.description.clone(),
        }
    }
}

/// How many enabled policies target a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleCoverage {
    pub role: String,
    pub policy_count: usize,
    pub permission_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageReport {
    pub rbac_count: usize,
    pub abac_count: usize,
    pub enabled_abac_count: usize,
    /// Covered share of RBAC permissions, rounded to one decimal. Zero when
    /// there are no RBAC permissions.
    pub coverage_percent: f64,
    pub missing_policies: Vec<MissingPolicy>,
    pub role_coverage: Vec<RoleCoverage>,
}

impl CoverageReport {
    pub fn covered_count(&self) -> usize {
        self.rbac_count - self.missing_policies.len()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_policies.is_empty()
    }
}

/// Compares the stores behind the RBAC fallback and the ABAC evaluator.
#[derive(Debug)]
pub struct CoverageAnalyzer<P: PolicyStore, R: RoleStore> {
    policies: Arc<P>,
    roles: Arc<R>,
}

impl<P: PolicyStore, R: RoleStore> CoverageAnalyzer<P, R> {
    pub fn new(policies: Arc<P>, roles: Arc<R>) -> Self {
        Self { policies, roles }
    }

    /// Reads both stores directly, bypassing the policy cache.
    pub fn get_coverage(&self) -> Result<CoverageReport> {
        let permissions = self.roles.permissions()?;
        let roles = self.roles.roles()?;
        let policies = self.policies.list_policies()?;
        Ok(analyze(&permissions, &roles, &policies))
    }
}

/// Builds a coverage report from already-loaded data.
pub fn analyze(permissions: &[Permission], roles: &[Role], policies: &[Policy]) -> CoverageReport {
    let enabled: Vec<&Policy> = policies.iter().filter(|p| p.enabled).collect();

    let missing_policies: Vec<MissingPolicy> = permissions
        .iter()
        .filter(|permission| !enabled.iter().any(|policy| covers(policy, permission)))
        .map(MissingPolicy::from)
        .collect();

    let role_coverage = roles
        .iter()
        .map(|role| RoleCoverage {
            role: role.name.clone(),
            policy_count: enabled
                .iter()
                .filter(|policy| targets_role(&policy.subject, &role.name))
                .count(),
            permission_count: role.permissions.len(),
        })
        .collect();

    CoverageReport {
        rbac_count: permissions.len(),
        abac_count: policies.len(),
        enabled_abac_count: enabled.len(),
        coverage_percent: percent(permissions.len() - missing_policies.len(), permissions.len()),
        missing_policies,
        role_coverage,
    }
}

/// Resource coverage is `*`, exact, or `<prefix>:*`. Suffix and middle
/// wildcards are too narrow to stand in for a whole RBAC permission.
fn covers(policy: &Policy, permission: &Permission) -> bool {
    let resource_covered = match ResourcePattern::parse(&policy.resource) {
        pattern @ (ResourcePattern::Wildcard
        | ResourcePattern::Exact(_)
        | ResourcePattern::PrefixWildcard(_)) => match_resource(&pattern, &permission.resource),
        ResourcePattern::SuffixWildcard(_) | ResourcePattern::MiddleWildcard { .. } => false,
    };
    resource_covered && match_action(&ActionPattern::parse(&policy.action), &permission.action)
}

fn targets_role(subject: &str, role: &str) -> bool {
    subject == "*" || subject.contains(&format!("role:{role}"))
}

#[allow(clippy::cast_precision_loss)]
fn percent(covered: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (covered as f64 / total as f64 * 1000.0).round() / 10.0
}

// ============================================================================
// Tests
// ============================================================================
