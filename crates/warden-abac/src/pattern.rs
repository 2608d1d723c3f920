//! Parsed subject, resource, and action patterns.
//!
//! Policies store their patterns as strings. They are parsed once, when the
//! policy cache loads them, so the matchers in [`crate::matcher`] work on
//! tagged variants instead of re-splitting strings on every check.
//!
//! Parsing is total: anything that is not a recognised wildcard form becomes
//! a literal.

use serde::{Deserialize, Serialize};

// ============================================================================
// Subject
// ============================================================================

/// Who a policy applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubjectPattern {
    /// `*`: every requester.
    Wildcard,
    /// `role:<name>`
    Role(String),
    /// `user:<id-or-username>`
    User(String),
    /// `department:<name>`
    Department(String),
    /// `status:<status>`
    Status(String),
    /// `email:<address>` or `email:*<suffix>`
    Email(EmailPattern),
    /// Anything else, compared against the requester id or username.
    Literal(String),
}

/// The value part of an `email:` subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmailPattern {
    Exact(String),
    /// The pattern contained `*`; stored with its first `*` removed.
    Suffix(String),
}

impl SubjectPattern {
    pub fn parse(pattern: &str) -> Self {
        if pattern == "*" {
            return SubjectPattern::Wildcard;
        }

        let Some((kind, value)) = pattern.split_once(':') else {
            return SubjectPattern::Literal(pattern.to_string());
        };

        match kind {
            "role" => SubjectPattern::Role(value.to_string()),
            "user" => SubjectPattern::User(value.to_string()),
            "department" => SubjectPattern::Department(value.to_string()),
            "status" => SubjectPattern::Status(value.to_string()),
            "email" if value.contains('*') => {
                SubjectPattern::Email(EmailPattern::Suffix(value.replacen('*', "", 1)))
            }
            "email" => SubjectPattern::Email(EmailPattern::Exact(value.to_string())),
            _ => SubjectPattern::Literal(pattern.to_string()),
        }
    }

    /// Short name of the parsed form.
    pub fn kind(&self) -> &'static str {
        match self {
            SubjectPattern::Wildcard => "wildcard",
            SubjectPattern::Role(_) => "role",
            SubjectPattern::User(_) => "user",
            SubjectPattern::Department(_) => "department",
            SubjectPattern::Status(_) => "status",
            SubjectPattern::Email(EmailPattern::Exact(_)) => "email",
            SubjectPattern::Email(EmailPattern::Suffix(_)) => "email-suffix",
            SubjectPattern::Literal(_) => "literal",
        }
    }
}

// ============================================================================
// Resource
// ============================================================================

/// What a policy applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourcePattern {
    /// `*`
    Wildcard,
    /// A literal resource name. Also used for unrecognised `*` placements.
    Exact(String),
    /// `<prefix>:*`, matching `<prefix>` itself and `<prefix>:...`.
    PrefixWildcard(String),
    /// `*:<suffix>`
    SuffixWildcard(String),
    /// `<prefix>:*:<suffix>`
    MiddleWildcard { prefix: String, suffix: String },
}

impl ResourcePattern {
    /// Forms are tried in order: `*`, `<p>:*`, `*:<s>`, `<p>:*:<s>`, literal.
    pub fn parse(pattern: &str) -> Self {
        if pattern == "*" {
            return ResourcePattern::Wildcard;
        }
        if let Some(prefix) = pattern.strip_suffix(":*") {
            return ResourcePattern::PrefixWildcard(prefix.to_string());
        }
        if let Some(suffix) = pattern.strip_prefix("*:") {
            return ResourcePattern::SuffixWildcard(suffix.to_string());
        }
        if let Some((prefix, suffix)) = pattern.split_once(":*:") {
            return ResourcePattern::MiddleWildcard {
                prefix: prefix.to_string(),
                suffix: suffix.to_string(),
            };
        }
        ResourcePattern::Exact(pattern.to_string())
    }

    /// Returns true if the pattern contains a `*` that did not parse into a
    /// wildcard form and will therefore only match itself literally.
    pub fn has_literal_star(&self) -> bool {
        matches!(self, ResourcePattern::Exact(value) if value.contains('*'))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ResourcePattern::Wildcard => "wildcard",
            ResourcePattern::Exact(_) => "exact",
            ResourcePattern::PrefixWildcard(_) => "prefix",
            ResourcePattern::SuffixWildcard(_) => "suffix",
            ResourcePattern::MiddleWildcard { .. } => "middle",
        }
    }
}

// ============================================================================
// Action
// ============================================================================

/// Which operations a policy applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionPattern {
    /// `*`
    Wildcard,
    Exact(String),
    /// `read, write, ...` split on `,` with each part trimmed.
    CommaList(Vec<String>),
}

impl ActionPattern {
    pub fn parse(pattern: &str) -> Self {
        if pattern == "*" {
            return ActionPattern::Wildcard;
        }
        if pattern.contains(',') {
            return ActionPattern::CommaList(
                pattern.split(',').map(|part| part.trim().to_string()).collect(),
            );
        }
        ActionPattern::Exact(pattern.to_string())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ActionPattern::Wildcard => "wildcard",
            ActionPattern::Exact(_) => "exact",
            ActionPattern::CommaList(_) => "list",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
