//! ABAC policy definitions.
//!
//! A policy is one named rule: a subject, resource, and action pattern, an
//! optional set of conditions, an effect, and a priority. Policies are
//! evaluated by priority (highest first), and the first matching policy
//! determines the outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use warden_types::PolicyId;

use crate::conditions::{CompiledConditions, PolicyConditions};
use crate::pattern::{ActionPattern, ResourcePattern, SubjectPattern};

// ============================================================================
// Effect
// ============================================================================

/// The effect of a policy: allow or deny access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Effect {
    /// Grant access.
    Allow,
    /// Deny access.
    Deny,
}

impl Default for Effect {
    /// Defaults to `Deny` (safe default: deny unless explicitly allowed).
    fn default() -> Self {
        Self::Deny
    }
}

impl Effect {
    pub fn is_allow(self) -> bool {
        matches!(self, Effect::Allow)
    }
}

// ============================================================================
// Policy
// ============================================================================

/// A stored authorization policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub id: PolicyId,
    /// Human-readable name for audit logging. Not unique.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub effect: Effect,
    pub subject: String,
    pub resource: String,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<PolicyConditions>,
    /// Evaluation priority. Higher values are evaluated first.
    #[serde(default)]
    pub priority: i32,
    /// Disabled policies never take part in evaluation.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

fn enabled_by_default() -> bool {
    true
}

// ============================================================================
// Draft
// ============================================================================

/// The writable fields of a policy, used for create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub effect: Effect,
    pub subject: String,
    pub resource: String,
    pub action: String,
    #[serde(default)]
    pub conditions: Option<PolicyConditions>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl PolicyDraft {
    /// Creates an enabled draft with priority 0 and no conditions.
    pub fn new(
        name: impl Into<String>,
        effect: Effect,
        subject: impl Into<String>,
        resource: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            effect,
            subject: subject.into(),
            resource: resource.into(),
            action: action.into(),
            conditions: None,
            priority: 0,
            enabled: true,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_conditions(mut self, conditions: PolicyConditions) -> Self {
        self.conditions = Some(conditions);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Materialises the draft as a stored policy.
    pub fn into_policy(self, id: PolicyId, now: DateTime<Utc>) -> Policy {
        Policy {
            id,
            name: self.name,
            description: self.description,
            effect: self.effect,
            subject: self.subject,
            resource: self.resource,
            action: self.action,
            conditions: self.conditions,
            priority: self.priority,
            enabled: self.enabled,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites the writable fields of `policy`, keeping its id and
    /// creation time.
    pub fn apply_to(self, policy: &mut Policy, now: DateTime<Utc>) {
        policy.name = self.name;
        policy.description = self.description;
        policy.effect = self.effect;
        policy.subject = self.subject;
        policy.resource = self.resource;
        policy.action = self.action;
        policy.conditions = self.conditions;
        policy.priority = self.priority;
        policy.enabled = self.enabled;
        policy.updated_at = now;
    }
}

// ============================================================================
// CompiledPolicy
// ============================================================================

/// A policy with its patterns and conditions parsed for evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPolicy {
    pub policy: Policy,
    pub subject: SubjectPattern,
    pub resource: ResourcePattern,
    pub action: ActionPattern,
    pub conditions: Option<CompiledConditions>,
}

impl CompiledPolicy {
    pub fn compile(policy: Policy) -> Self {
        Self {
            subject: SubjectPattern::parse(&policy.subject),
            resource: ResourcePattern::parse(&policy.resource),
            action: ActionPattern::parse(&policy.action),
            conditions: policy.conditions.as_ref().map(CompiledConditions::compile),
            policy,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_default_effect_is_deny() {
        assert_eq!(Effect::default(), Effect::Deny);
    }

    #[test]
    fn test_effect_wire_form() {
        assert_eq!(serde_json::to_string(&Effect::Allow).unwrap(), "\"ALLOW\"");
        assert_eq!(
            serde_json::from_str::<Effect>("\"DENY\"").unwrap(),
            Effect::Deny
        );
    }

    #[test]
    fn test_draft_builder() {
        let draft = PolicyDraft::new("admins", Effect::Allow, "role:admin", "*", "*")
            .with_priority(100)
            .with_description("Administrators can do anything")
            .with_conditions(PolicyConditions::time_window(Some("08:00"), None))
            .disabled();

        assert_eq!(draft.priority, 100);
        assert!(!draft.enabled);
        assert!(draft.conditions.is_some());

        let policy = draft.into_policy(PolicyId::new(1), now());
        assert_eq!(policy.id, PolicyId::new(1));
        assert_eq!(policy.created_at, now());
        assert_eq!(policy.updated_at, now());
    }

    #[test]
    fn test_apply_keeps_identity_and_creation_time() {
        let mut policy = PolicyDraft::new("a", Effect::Allow, "*", "*", "read")
            .into_policy(PolicyId::new(3), now());
        let later = now() + chrono::Duration::hours(1);

        PolicyDraft::new("b", Effect::Deny, "role:x", "user", "delete")
            .with_priority(5)
            .apply_to(&mut policy, later);

        assert_eq!(policy.id, PolicyId::new(3));
        assert_eq!(policy.name, "b");
        assert_eq!(policy.effect, Effect::Deny);
        assert_eq!(policy.priority, 5);
        assert_eq!(policy.created_at, now());
        assert_eq!(policy.updated_at, later);
    }

    #[test]
    fn test_compile_parses_every_pattern() {
        let policy = PolicyDraft::new("p", Effect::Allow, "role:admin", "user:*", "read,write")
            .with_conditions(PolicyConditions::time_window(Some("09:00"), Some("17:00")))
            .into_policy(PolicyId::new(1), now());

        let compiled = CompiledPolicy::compile(policy);
        assert_eq!(compiled.subject, SubjectPattern::Role("admin".into()));
        assert_eq!(compiled.resource, ResourcePattern::PrefixWildcard("user".into()));
        assert_eq!(
            compiled.action,
            ActionPattern::CommaList(vec!["read".into(), "write".into()])
        );
        assert!(compiled.conditions.and_then(|c| c.time).is_some());
    }

    #[test]
    fn test_policy_deserializes_with_defaults() {
        let policy: Policy = serde_json::from_str(
            r#"{
                "id": 9,
                "name": "readers",
                "effect": "ALLOW",
                "subject": "role:reader",
                "resource": "report:*",
                "action": "read"
            }"#,
        )
        .expect("deserialize policy");

        assert!(policy.enabled);
        assert_eq!(policy.priority, 0);
        assert!(policy.conditions.is_none());
        assert_eq!(policy.id, PolicyId::new(9));
    }
}
