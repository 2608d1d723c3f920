//! Matcher functions.
//!
//! Four independent predicates over parsed patterns. Each is total: it never
//! panics and only ever answers yes or no. All comparisons are
//! case-sensitive.

use crate::attributes::RequesterAttributes;
use crate::conditions::{CompiledConditions, TimeOfDay};
use crate::pattern::{ActionPattern, EmailPattern, ResourcePattern, SubjectPattern};

/// Returns true if the subject pattern selects the requester.
pub fn match_subject(pattern: &SubjectPattern, requester: &RequesterAttributes) -> bool {
    match pattern {
        SubjectPattern::Wildcard => true,
        SubjectPattern::Role(role) => requester.roles.contains(role),
        SubjectPattern::User(user) => *user == requester.id || *user == requester.username,
        SubjectPattern::Department(dept) => requester.departments.contains(dept),
        SubjectPattern::Status(status) => status == requester.status.as_str(),
        SubjectPattern::Email(EmailPattern::Exact(email)) => {
            requester.email.as_deref() == Some(email.as_str())
        }
        SubjectPattern::Email(EmailPattern::Suffix(suffix)) => requester
            .email
            .as_deref()
            .is_some_and(|email| email.ends_with(suffix.as_str())),
        SubjectPattern::Literal(literal) => {
            *literal == requester.id || *literal == requester.username
        }
    }
}

/// Returns true if the resource pattern covers `resource`.
pub fn match_resource(pattern: &ResourcePattern, resource: &str) -> bool {
    match pattern {
        ResourcePattern::Wildcard => true,
        ResourcePattern::Exact(exact) => exact == resource,
        ResourcePattern::PrefixWildcard(prefix) => {
            resource == prefix || starts_with_segment(resource, prefix)
        }
        ResourcePattern::SuffixWildcard(suffix) => resource.ends_with(suffix.as_str()),
        ResourcePattern::MiddleWildcard { prefix, suffix } => {
            starts_with_segment(resource, prefix) && ends_with_segment(resource, suffix)
        }
    }
}

/// Returns true if the action pattern covers `action`.
pub fn match_action(pattern: &ActionPattern, action: &str) -> bool {
    match pattern {
        ActionPattern::Wildcard => true,
        ActionPattern::Exact(exact) => exact == action,
        ActionPattern::CommaList(actions) => actions.iter().any(|a| a == action),
    }
}

/// Inputs available to condition checks.
#[derive(Debug, Clone, Copy)]
pub struct ConditionContext<'a> {
    pub requester: &'a RequesterAttributes,
    /// Evaluation-time wall clock, to the minute.
    pub local_time: TimeOfDay,
}

/// Returns true if every present condition passes. Absent conditions pass.
///
/// Unknown condition keys are ignored.
pub fn evaluate_conditions(
    conditions: Option<&CompiledConditions>,
    context: &ConditionContext<'_>,
) -> bool {
    let Some(conditions) = conditions else {
        return true;
    };

    // New condition kinds join this conjunction.
    conditions
        .time
        .as_ref()
        .is_none_or(|window| window.contains(context.local_time))
}

/// `resource` starts with `<prefix>:`.
fn starts_with_segment(resource: &str, prefix: &str) -> bool {
    resource
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with(':'))
}

/// `resource` ends with `:<suffix>`.
fn ends_with_segment(resource: &str, suffix: &str) -> bool {
    resource
        .strip_suffix(suffix)
        .is_some_and(|rest| rest.ends_with(':'))
}

// ============================================================================
// Tests
// ============================================================================
