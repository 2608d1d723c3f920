//! Role and permission storage.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::RoleStoreError;
use crate::permissions::Permission;
use crate::roles::Role;

/// Read access to roles, role assignments, and the permission catalogue.
pub trait RoleStore: Send + Sync {
    /// Roles assigned to the requester. Unknown requesters have none.
    fn roles_for_requester(&self, requester_id: &str) -> Result<Vec<Role>, RoleStoreError>;

    /// Every defined role.
    fn roles(&self) -> Result<Vec<Role>, RoleStoreError>;

    /// Every catalogued permission.
    fn permissions(&self) -> Result<Vec<Permission>, RoleStoreError>;
}

/// The serialized form of an RBAC model.
///
/// ```json
/// {
///   "permissions": [{"resource": "user", "action": "read"}],
///   "roles": [{"name": "viewer", "permissions": ["user:read"]}],
///   "assignments": {"42": ["viewer"]}
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCatalog {
    #[serde(default)]
    pub permissions: Vec<Permission>,
    #[serde(default)]
    pub roles: Vec<Role>,
    /// Requester id to role names.
    #[serde(default)]
    pub assignments: BTreeMap<String, BTreeSet<String>>,
}

/// A [`RoleStore`] held entirely in memory.
///
/// Concrete role grants (no `*`) are added to the permission catalogue
/// automatically, so the catalogue always covers what roles actually grant.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRoleStore {
    permissions: BTreeMap<String, Permission>,
    roles: BTreeMap<String, Role>,
    assignments: BTreeMap<String, BTreeSet<String>>,
}

impl InMemoryRoleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_catalog(catalog: RoleCatalog) -> Self {
        let mut store = Self::new();
        for permission in catalog.permissions {
            store.add_permission(permission);
        }
        for role in catalog.roles {
            store.add_role(role);
        }
        for (requester, roles) in catalog.assignments {
            for role in roles {
                store.assign(requester.clone(), role);
            }
        }
        store
    }

    /// Adds a permission to the catalogue, replacing any entry with the same
    /// code.
    pub fn add_permission(&mut self, permission: Permission) {
        self.permissions.insert(permission.code(), permission);
    }

    /// Defines or replaces a role.
    pub fn add_role(&mut self, role: Role) {
        for code in role.permissions.iter() {
            if code.contains('*') || self.permissions.contains_key(code) {
                continue;
            }
            if let Some(permission) = Permission::parse(code) {
                self.permissions.insert(code.to_string(), permission);
            }
        }
        self.roles.insert(role.name.clone(), role);
    }

    pub fn assign(&mut self, requester_id: impl Into<String>, role: impl Into<String>) {
        self.assignments
            .entry(requester_id.into())
            .or_default()
            .insert(role.into());
    }

    pub fn unassign(&mut self, requester_id: &str, role: &str) {
        if let Some(roles) = self.assignments.get_mut(requester_id) {
            roles.remove(role);
        }
    }
}

impl RoleStore for InMemoryRoleStore {
    fn roles_for_requester(&self, requester_id: &str) -> Result<Vec<Role>, RoleStoreError> {
        let Some(names) = self.assignments.get(requester_id) else {
            return Ok(Vec::new());
        };
        names
            .iter()
            .map(|name| {
                self.roles
                    .get(name)
                    .cloned()
                    .ok_or_else(|| RoleStoreError::RoleNotFound(name.clone()))
            })
            .collect()
    }

    fn roles(&self) -> Result<Vec<Role>, RoleStoreError> {
        Ok(self.roles.values().cloned().collect())
    }

    fn permissions(&self) -> Result<Vec<Permission>, RoleStoreError> {
        Ok(self.permissions.values().cloned().collect())
    }
}
