//! Role definitions for RBAC.
//!
//! A role is a named, flat set of permission codes. Roles do not inherit
//! from one another.

use serde::{Deserialize, Serialize};

use crate::permissions::PermissionSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: PermissionSet,
}

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            permissions: PermissionSet::empty(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Grants a permission code such as `"user:read"` or `"user:*"`.
    pub fn grant(mut self, code: impl Into<String>) -> Self {
        self.permissions.grant(code);
        self
    }

    pub fn allows(&self, resource: &str, action: &str) -> bool {
        self.permissions.allows(resource, action)
    }
}
