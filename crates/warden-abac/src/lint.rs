//! Static checks over stored policies.
//!
//! Pattern parsing never fails: anything unrecognised degrades to a literal
//! and a malformed time bound silently disables its policy. Linting surfaces
//! those cases before they cause a surprising denial.

use std::fmt;

use serde::Serialize;
use warden_types::PolicyId;

use crate::pattern::{ActionPattern, ResourcePattern, SubjectPattern};
use crate::policy::{CompiledPolicy, Policy};
use crate::store::sort_for_evaluation;

const KNOWN_SUBJECT_TYPES: &[&str] = &["role", "user", "department", "status", "email"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LintKind {
    /// `<type>:<value>` with a type the matcher does not know.
    UnknownSubjectType,
    /// A `*` in a resource that is not one of the wildcard forms.
    LiteralStarInResource,
    /// `*` inside a comma list only matches an action named `*`.
    WildcardInActionList,
    /// A subject, resource, or action pattern that is empty.
    EmptyPattern,
    /// A time bound that is not `HH:MM`; the policy can never match.
    MalformedTimeBound,
    /// Condition keys the evaluator ignores.
    IgnoredConditionKeys,
    /// An earlier unconditional catch-all decides every request first.
    Unreachable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintFinding {
    pub policy_id: PolicyId,
    pub policy_name: String,
    pub severity: Severity,
    pub kind: LintKind,
    pub message: String,
}

/// How one policy's patterns were parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternForms {
    pub policy_id: PolicyId,
    pub policy_name: String,
    pub enabled: bool,
    pub priority: i32,
    pub subject: &'static str,
    pub resource: &'static str,
    pub action: &'static str,
}

/// Parsed pattern forms for every policy, in evaluation order.
pub fn pattern_forms(policies: &[Policy]) -> Vec<PatternForms> {
    let mut ordered = policies.to_vec();
    sort_for_evaluation(&mut ordered);
    ordered
        .into_iter()
        .map(|policy| {
            let compiled = CompiledPolicy::compile(policy);
            PatternForms {
                subject: compiled.subject.kind(),
                resource: compiled.resource.kind(),
                action: compiled.action.kind(),
                policy_id: compiled.policy.id,
                enabled: compiled.policy.enabled,
                priority: compiled.policy.priority,
                policy_name: compiled.policy.name,
            }
        })
        .collect()
}

/// Checks every policy, enabled or not. Findings follow evaluation order.
pub fn lint_policies(policies: &[Policy]) -> Vec<LintFinding> {
    let mut ordered = policies.to_vec();
    sort_for_evaluation(&mut ordered);

    let mut findings = Vec::new();
    let mut catch_all: Option<String> = None;

    for policy in ordered {
        let compiled = CompiledPolicy::compile(policy);
        let mut report = |severity, kind, message: String| {
            findings.push(LintFinding {
                policy_id: compiled.policy.id,
                policy_name: compiled.policy.name.clone(),
                severity,
                kind,
                message,
            });
        };

        check_patterns(&compiled, &mut report);

        if let Some(conditions) = &compiled.conditions {
            if let Some(window) = &conditions.time {
                for raw in window.malformed_bounds() {
                    report(
                        Severity::Warning,
                        LintKind::MalformedTimeBound,
                        format!("time bound '{raw}' is not HH:MM; the policy never matches"),
                    );
                }
            }
            if !conditions.ignored_keys.is_empty() {
                report(
                    Severity::Info,
                    LintKind::IgnoredConditionKeys,
                    format!(
                        "condition keys [{}] are not evaluated",
                        conditions.ignored_keys.join(", ")
                    ),
                );
            }
        }

        if !compiled.policy.enabled {
            continue;
        }
        if let Some(winner) = &catch_all {
            report(
                Severity::Warning,
                LintKind::Unreachable,
                format!("policy '{winner}' matches every request first"),
            );
        } else if is_catch_all(&compiled) {
            catch_all = Some(compiled.policy.name.clone());
        }
    }

    findings
}

fn check_patterns(
    compiled: &CompiledPolicy,
    report: &mut impl FnMut(Severity, LintKind, String),
) {
    let policy = &compiled.policy;

    for (field, raw) in [
        ("subject", &policy.subject),
        ("resource", &policy.resource),
        ("action", &policy.action),
    ] {
        if raw.trim().is_empty() {
            report(
                Severity::Warning,
                LintKind::EmptyPattern,
                format!("{field} pattern is empty"),
            );
        }
    }

    if let SubjectPattern::Literal(literal) = &compiled.subject
        && let Some((kind, _)) = literal.split_once(':')
        && !KNOWN_SUBJECT_TYPES.contains(&kind)
    {
        report(
            Severity::Warning,
            LintKind::UnknownSubjectType,
            format!(
                "subject type '{kind}' is unknown; '{literal}' only matches a requester id or username equal to it"
            ),
        );
    }

    if compiled.resource.has_literal_star() {
        report(
            Severity::Warning,
            LintKind::LiteralStarInResource,
            format!(
                "resource '{}' is not a wildcard form; its '*' is matched literally",
                policy.resource
            ),
        );
    }

    if let ActionPattern::CommaList(actions) = &compiled.action
        && actions.iter().any(|a| a == "*")
    {
        report(
            Severity::Warning,
            LintKind::WildcardInActionList,
            format!(
                "action list '{}' contains '*', which only matches an action named '*'",
                policy.action
            ),
        );
    }
}

fn is_catch_all(compiled: &CompiledPolicy) -> bool {
    compiled.subject == SubjectPattern::Wildcard
        && compiled.resource == ResourcePattern::Wildcard
        && compiled.action == ActionPattern::Wildcard
        && compiled.conditions.is_none()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::PolicyConditions;
    use crate::policy::{Effect, PolicyDraft};
    use chrono::{TimeZone, Utc};
    use test_case::test_case;

    fn policy(id: u64, draft: PolicyDraft) -> Policy {
        let now = Utc.with_ymd_and_hms(2025, 1, 8, 10, 0, 0).unwrap();
        draft.into_policy(PolicyId::new(id), now)
    }

    fn kinds(findings: &[LintFinding]) -> Vec<LintKind> {
        findings.iter().map(|f| f.kind).collect()
    }

    #[test]
    fn test_clean_policies_have_no_findings() {
        let policies = vec![
            policy(1, PolicyDraft::new("a", Effect::Deny, "*", "*", "delete").with_priority(10)),
            policy(2, PolicyDraft::new("b", Effect::Allow, "role:admin", "user:*", "read,write")),
            policy(3, PolicyDraft::new("c", Effect::Allow, "email:*@x.com", "org:*:billing", "read")),
        ];
        assert!(lint_policies(&policies).is_empty());
    }

    #[test_case("group:admins", "*", "read", LintKind::UnknownSubjectType)]
    #[test_case("*", "us*er", "read", LintKind::LiteralStarInResource)]
    #[test_case("*", "user", "read,*", LintKind::WildcardInActionList)]
    #[test_case("", "user", "read", LintKind::EmptyPattern)]
    fn test_pattern_findings(subject: &str, resource: &str, action: &str, expected: LintKind) {
        let policies = vec![policy(
            1,
            PolicyDraft::new("p", Effect::Allow, subject, resource, action),
        )];
        assert_eq!(kinds(&lint_policies(&policies)), vec![expected]);
    }

    #[test]
    fn test_bare_literal_subject_is_fine() {
        let policies = vec![policy(1, PolicyDraft::new("p", Effect::Allow, "alice", "*", "read"))];
        assert!(lint_policies(&policies).is_empty());
    }

    #[test]
    fn test_condition_findings() {
        let mut conditions = PolicyConditions::time_window(Some("9am"), Some("17:00"));
        conditions
            .other
            .insert("ip".into(), serde_json::json!({"cidr": "10.0.0.0/8"}));
        let policies = vec![policy(
            1,
            PolicyDraft::new("p", Effect::Allow, "*", "doc", "read").with_conditions(conditions),
        )];

        let findings = lint_policies(&policies);
        assert_eq!(
            kinds(&findings),
            vec![LintKind::MalformedTimeBound, LintKind::IgnoredConditionKeys]
        );
        assert!(findings[0].message.contains("9am"));
        assert_eq!(findings[0].severity, Severity::Warning);
        assert_eq!(findings[1].severity, Severity::Info);
    }

    #[test]
    fn test_pattern_forms_follow_evaluation_order() {
        let policies = vec![
            policy(1, PolicyDraft::new("low", Effect::Allow, "group:ops", "us*er", "read")),
            policy(2, PolicyDraft::new("high", Effect::Deny, "role:a", "org:*:b", "x,y").with_priority(9)),
        ];

        let forms = pattern_forms(&policies);
        assert_eq!(forms[0].policy_name, "high");
        assert_eq!((forms[0].subject, forms[0].resource, forms[0].action), ("role", "middle", "list"));
        assert_eq!((forms[1].subject, forms[1].resource, forms[1].action), ("literal", "exact", "exact"));
    }

    #[test]
    fn test_catch_all_shadows_lower_priority() {
        let policies = vec![
            policy(1, PolicyDraft::new("low", Effect::Allow, "role:admin", "*", "*")),
            policy(2, PolicyDraft::new("everything", Effect::Deny, "*", "*", "*").with_priority(5)),
            policy(3, PolicyDraft::new("off", Effect::Allow, "*", "*", "*").disabled()),
        ];

        let findings = lint_policies(&policies);
        assert_eq!(kinds(&findings), vec![LintKind::Unreachable]);
        assert_eq!(findings[0].policy_name, "low");
        assert!(findings[0].message.contains("everything"));
    }
}
