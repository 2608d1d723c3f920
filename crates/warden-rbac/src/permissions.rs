//! Permission types for the legacy RBAC model.
//!
//! A permission is a `(resource, action)` pair written as the code
//! `"<resource>:<action>"`. Roles hold sets of codes, and a code may use `*`
//! in either position.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A catalogued permission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Permission {
    pub resource: String,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Permission {
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Splits a code on its last `:`, since resources may themselves
    /// contain `:`. Returns `None` if there is no separator.
    pub fn parse(code: &str) -> Option<Self> {
        let (resource, action) = code.rsplit_once(':')?;
        Some(Self::new(resource, action))
    }

    /// `"<resource>:<action>"`
    pub fn code(&self) -> String {
        format!("{}:{}", self.resource, self.action)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.action)
    }
}

/// Set of permission codes granted to a role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet {
    codes: BTreeSet<String>,
}

impl PermissionSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    /// Adds a code. Granting twice is a no-op.
    pub fn grant(&mut self, code: impl Into<String>) {
        self.codes.insert(code.into());
    }

    pub fn revoke(&mut self, code: &str) {
        self.codes.remove(code);
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Adds every code from `other`.
    pub fn extend(&mut self, other: &PermissionSet) {
        self.codes.extend(other.codes.iter().cloned());
    }

    /// Returns true if the set holds `resource:action`, `resource:*`,
    /// `*:action`, or `*:*`.
    pub fn allows(&self, resource: &str, action: &str) -> bool {
        [
            format!("{resource}:{action}"),
            format!("{resource}:*"),
            format!("*:{action}"),
            "*:*".to_string(),
        ]
        .iter()
        .any(|code| self.codes.contains(code))
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            codes: iter.into_iter().map(Into::into).collect(),
        }
    }
}
