//! The authorization gate.
//!
//! ```text
//! START → ABAC_EVALUATE ─┬─ allowed ──────────────────────────→ ALLOWED
//!                        └─ denied ─┬─ abac_only ─────────────→ DENIED_FINAL
//!                                   └─ otherwise → RBAC_EVALUATE ─┬→ ALLOWED
//!                                                                 └→ DENIED_FINAL
//! ```
//!
//! A requester that is not ACTIVE is denied by ABAC like any other denial;
//! only ABAC-only deployments make that final.

use serde::Serialize;
use tracing::{info, warn};
use warden_abac::{EvaluationResult, Evaluator, Outcome, PolicyStore, RequesterAttributes};
use warden_rbac::{RbacChecker, RoleStore};

use crate::error::Result;

/// Which stage produced the final decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionPath {
    /// ABAC allowed the request.
    Abac,
    /// ABAC denied and a role grant allowed it.
    RbacFallback,
    /// Every consulted stage denied.
    Denied,
}

/// The gate's answer for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GateDecision {
    pub allowed: bool,
    pub path: DecisionPath,
    /// Names of the ABAC policies that decided the request, if any.
    pub matched_policies: Vec<String>,
    pub reason: String,
    /// What an operator could change to grant the request. Only set for
    /// ABAC-only denials.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

/// Runs ABAC, then optionally the legacy RBAC fallback.
#[derive(Debug)]
pub struct AuthorizationGate<P: PolicyStore, R: RoleStore> {
    evaluator: Evaluator<P>,
    rbac: RbacChecker<R>,
    abac_only: bool,
}

impl<P: PolicyStore, R: RoleStore> AuthorizationGate<P, R> {
    /// Creates a gate with the RBAC fallback enabled.
    pub fn new(evaluator: Evaluator<P>, rbac: RbacChecker<R>) -> Self {
        Self {
            evaluator,
            rbac,
            abac_only: false,
        }
    }

    /// When set, ABAC denials are final and RBAC is never consulted.
    pub fn with_abac_only(mut self, abac_only: bool) -> Self {
        self.abac_only = abac_only;
        self
    }

    pub fn is_authorized(
        &self,
        requester: &RequesterAttributes,
        resource: &str,
        action: &str,
    ) -> Result<bool> {
        self.authorize(requester, resource, action)
            .map(|decision| decision.allowed)
    }

    pub fn authorize(
        &self,
        requester: &RequesterAttributes,
        resource: &str,
        action: &str,
    ) -> Result<GateDecision> {
        let abac = self
            .evaluator
            .evaluate_with_details(requester, resource, action)?;
        let matched_policies: Vec<String> =
            abac.matched_policy.iter().map(|p| p.name.clone()).collect();

        let decision = if abac.allowed {
            GateDecision {
                allowed: true,
                path: DecisionPath::Abac,
                matched_policies,
                reason: abac.reason,
                remediation: None,
            }
        } else if self.abac_only && abac.outcome == Outcome::InactiveRequester {
            GateDecision {
                allowed: false,
                path: DecisionPath::Denied,
                matched_policies,
                reason: abac.reason,
                remediation: Some("Reactivate the requester account".to_string()),
            }
        } else if self.abac_only {
            GateDecision {
                allowed: false,
                path: DecisionPath::Denied,
                remediation: Some(remediation(&abac, resource, action)),
                matched_policies,
                reason: abac.reason,
            }
        } else {
            self.rbac_fallback(requester, resource, action, abac, matched_policies)?
        };

        if decision.allowed {
            info!(
                requester = requester.display_name(),
                resource,
                action,
                path = ?decision.path,
                "Access granted"
            );
        } else {
            warn!(
                requester = requester.display_name(),
                resource,
                action,
                policies = ?decision.matched_policies,
                abac_only = self.abac_only,
                "Access denied"
            );
        }

        Ok(decision)
    }

    fn rbac_fallback(
        &self,
        requester: &RequesterAttributes,
        resource: &str,
        action: &str,
        abac: EvaluationResult,
        matched_policies: Vec<String>,
    ) -> Result<GateDecision> {
        // Role assignments are keyed by id; username-only requesters are
        // looked up by username.
        let requester_id = if requester.id.is_empty() {
            requester.username.as_str()
        } else {
            requester.id.as_str()
        };

        let allowed = self.rbac.check_permission(requester_id, resource, action)?;
        let (path, reason) = if allowed {
            (
                DecisionPath::RbacFallback,
                format!(
                    "{}; allowed by RBAC role grant for '{resource}:{action}'",
                    abac.reason
                ),
            )
        } else {
            (
                DecisionPath::Denied,
                format!(
                    "{}; no RBAC role grants '{resource}:{action}'",
                    abac.reason
                ),
            )
        };

        Ok(GateDecision {
            allowed,
            path,
            matched_policies,
            reason,
            remediation: None,
        })
    }
}

fn remediation(abac: &EvaluationResult, resource: &str, action: &str) -> String {
    match &abac.matched_policy {
        Some(policy) => format!(
            "Policy '{}' (priority {}) denies this request. Narrow or disable it, \
             or add an ALLOW policy with a priority above {} covering resource \
             '{resource}' and action '{action}'.",
            policy.name, policy.priority, policy.priority
        ),
        None => format!(
            "No ABAC policy covers this request. Add an ALLOW policy for this \
             requester (for example subject 'role:<name>') with resource \
             '{resource}' and action '{action}'."
        ),
    }
}

// ============================================================================
// Tests
// ============================================================================
