//! Requester attributes for ABAC evaluation.
//!
//! Attributes are supplied by the caller on every check (typically from the
//! authenticated session) and are never persisted by this crate.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use warden_types::RequesterStatus;

use crate::error::AbacError;

/// Attributes describing the requester of an access check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequesterAttributes {
    /// Opaque requester identifier.
    #[serde(default)]
    pub id: String,
    /// Login name.
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Account status. Only `ACTIVE` requesters pass evaluation.
    #[serde(default)]
    pub status: RequesterStatus,
    /// Role names, compared case-sensitively.
    #[serde(default)]
    pub roles: BTreeSet<String>,
    #[serde(default)]
    pub departments: BTreeSet<String>,
    /// Free-form attributes for future condition kinds.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom: BTreeMap<String, serde_json::Value>,
}

impl RequesterAttributes {
    /// Creates an active requester with no roles or departments.
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            email: None,
            phone: None,
            status: RequesterStatus::Active,
            roles: BTreeSet::new(),
            departments: BTreeSet::new(),
            custom: BTreeMap::new(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.departments.insert(department.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_status(mut self, status: RequesterStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.custom.insert(key.into(), value);
        self
    }

    /// Label used in reasons and logs: the username, or the id when the
    /// username is empty.
    pub fn display_name(&self) -> &str {
        if self.username.is_empty() {
            &self.id
        } else {
            &self.username
        }
    }

    /// Fails when the requester carries neither an id nor a username.
    pub fn validate_identity(&self) -> Result<(), AbacError> {
        if self.id.is_empty() && self.username.is_empty() {
            return Err(AbacError::MissingIdentity);
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
