//! ABAC policy evaluation engine.
//!
//! Evaluates access requests against the cached policy list. Policies arrive
//! already ordered by priority; the first policy whose subject, resource,
//! action, and conditions all match decides the request. If none matches,
//! access is denied.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::attributes::RequesterAttributes;
use crate::cache::PolicyCache;
use crate::conditions::TimeOfDay;
use crate::error::AbacError;
use crate::matcher::{
    ConditionContext, evaluate_conditions, match_action, match_resource, match_subject,
};
use crate::policy::{CompiledPolicy, Effect, Policy};
use crate::store::PolicyStore;

// ============================================================================
// Results
// ============================================================================

/// Why an evaluation ended the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// An ALLOW policy matched.
    Allowed,
    /// A DENY policy matched.
    DeniedByPolicy,
    /// No policy matched.
    NoMatchingPolicy,
    /// The requester is not ACTIVE; no policy was consulted.
    InactiveRequester,
}

/// The result of evaluating one access request.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    pub allowed: bool,
    pub outcome: Outcome,
    /// The policy that decided the request, if any.
    pub matched_policy: Option<Policy>,
    /// Human-readable explanation of the decision.
    pub reason: String,
}

/// One `(resource, action)` pair in a bulk evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessRequest {
    pub resource: String,
    pub action: String,
}

impl AccessRequest {
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
        }
    }

    /// `"<resource>:<action>"`, the key used in bulk results.
    pub fn key(&self) -> String {
        format!("{}:{}", self.resource, self.action)
    }
}

// ============================================================================
// Evaluator
// ============================================================================

/// Evaluates access requests against policies loaded through a
/// [`PolicyCache`].
#[derive(Debug)]
pub struct Evaluator<S: PolicyStore> {
    cache: Arc<PolicyCache<S>>,
    /// Offset used to turn the clock into the `HH:MM` seen by time conditions.
    utc_offset: FixedOffset,
}

impl<S: PolicyStore> Evaluator<S> {
    /// Creates an evaluator that reads time conditions in UTC.
    pub fn new(cache: Arc<PolicyCache<S>>) -> Self {
        Self {
            cache,
            utc_offset: Utc.fix(),
        }
    }

    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = offset;
        self
    }

    pub fn cache(&self) -> &Arc<PolicyCache<S>> {
        &self.cache
    }

    /// Returns whether the requester may perform `action` on `resource`.
    pub fn evaluate(
        &self,
        requester: &RequesterAttributes,
        resource: &str,
        action: &str,
    ) -> Result<bool, AbacError> {
        self.evaluate_with_details(requester, resource, action)
            .map(|result| result.allowed)
    }

    /// Evaluates a request and explains the decision.
    ///
    /// # Errors
    ///
    /// [`AbacError::MissingIdentity`] if the requester has neither an id nor
    /// a username; [`AbacError::Store`] if policies cannot be loaded.
    pub fn evaluate_with_details(
        &self,
        requester: &RequesterAttributes,
        resource: &str,
        action: &str,
    ) -> Result<EvaluationResult, AbacError> {
        requester.validate_identity()?;
        if !requester.status.is_active() {
            return Ok(inactive_requester(requester));
        }

        let policies = self.cache.get_policies()?;
        Ok(decide(
            &policies,
            requester,
            resource,
            action,
            self.local_time(),
        ))
    }

    /// Evaluates many `(resource, action)` pairs for one requester, loading
    /// policies once for the whole batch.
    ///
    /// Results are keyed by [`AccessRequest::key`].
    pub fn evaluate_bulk(
        &self,
        requester: &RequesterAttributes,
        requests: &[AccessRequest],
    ) -> Result<BTreeMap<String, bool>, AbacError> {
        requester.validate_identity()?;
        if !requester.status.is_active() {
            debug!(
                requester = requester.display_name(),
                status = %requester.status,
                "Bulk evaluation denied for inactive requester"
            );
            return Ok(requests.iter().map(|r| (r.key(), false)).collect());
        }

        let policies = self.cache.get_policies()?;
        let local_time = self.local_time();

        Ok(requests
            .iter()
            .map(|request| {
                let result = decide(
                    &policies,
                    requester,
                    &request.resource,
                    &request.action,
                    local_time,
                );
                (request.key(), result.allowed)
            })
            .collect())
    }

    fn local_time(&self) -> TimeOfDay {
        TimeOfDay::at(self.cache.clock().now(), self.utc_offset)
    }
}

// ============================================================================
// Decision
// ============================================================================

/// First-match-wins decision over an evaluation-ordered policy list.
///
/// The caller is responsible for the status gate; this function only walks
/// the policies.
pub fn decide(
    policies: &[CompiledPolicy],
    requester: &RequesterAttributes,
    resource: &str,
    action: &str,
    local_time: TimeOfDay,
) -> EvaluationResult {
    let context = ConditionContext {
        requester,
        local_time,
    };

    for compiled in policies {
        let structural = match_subject(&compiled.subject, requester)
            && match_resource(&compiled.resource, resource)
            && match_action(&compiled.action, action);
        if !structural {
            continue;
        }

        let policy = &compiled.policy;
        if !evaluate_conditions(compiled.conditions.as_ref(), &context) {
            debug!(
                policy = %policy.name,
                priority = policy.priority,
                %local_time,
                "Policy matched but its conditions failed; trying next"
            );
            continue;
        }

        let allowed = policy.effect.is_allow();
        debug!(
            requester = requester.display_name(),
            resource,
            action,
            policy = %policy.name,
            priority = policy.priority,
            allowed,
            "Policy matched"
        );

        return EvaluationResult {
            allowed,
            outcome: if allowed {
                Outcome::Allowed
            } else {
                Outcome::DeniedByPolicy
            },
            reason: format!(
                "Policy '{}' (priority {}, {}) matched: subject '{}', resource '{}', action '{}'",
                policy.name,
                policy.priority,
                effect_label(policy.effect),
                policy.subject,
                policy.resource,
                policy.action,
            ),
            matched_policy: Some(policy.clone()),
        };
    }

    debug!(
        requester = requester.display_name(),
        resource, action, "No policy matched"
    );
    EvaluationResult {
        allowed: false,
        outcome: Outcome::NoMatchingPolicy,
        matched_policy: None,
        reason: format!(
            "No matching policy found for requester '{}' on resource '{resource}' with action '{action}'",
            requester.display_name(),
        ),
    }
}

fn inactive_requester(requester: &RequesterAttributes) -> EvaluationResult {
    debug!(
        requester = requester.display_name(),
        status = %requester.status,
        "Denied inactive requester"
    );
    EvaluationResult {
        allowed: false,
        outcome: Outcome::InactiveRequester,
        matched_policy: None,
        reason: format!(
            "Requester '{}' has status {}; only ACTIVE requesters are evaluated",
            requester.display_name(),
            requester.status,
        ),
    }
}

fn effect_label(effect: Effect) -> &'static str {
    match effect {
        Effect::Allow => "ALLOW",
        Effect::Deny => "DENY",
    }
}

// ============================================================================
// Tests
// ============================================================================
