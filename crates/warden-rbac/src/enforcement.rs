//! Permission checks against role assignments.
//!
//! This is the legacy path consulted only when ABAC denies and the
//! deployment still allows falling back to roles.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::RbacError;
use crate::permissions::PermissionSet;
use crate::store::RoleStore;

/// Checks requester permissions through their assigned roles.
#[derive(Debug)]
pub struct RbacChecker<S: RoleStore> {
    store: Arc<S>,
    /// Whether to log check outcomes.
    audit_enabled: bool,
}

impl<S: RoleStore> RbacChecker<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            audit_enabled: true,
        }
    }

    /// Disables outcome logging (for testing).
    pub fn without_audit(mut self) -> Self {
        self.audit_enabled = false;
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The union of every permission code granted by the requester's roles.
    pub fn effective_permissions(&self, requester_id: &str) -> Result<PermissionSet, RbacError> {
        if requester_id.is_empty() {
            return Err(RbacError::MissingIdentity);
        }

        let mut effective = PermissionSet::empty();
        for role in self.store.roles_for_requester(requester_id)? {
            effective.extend(&role.permissions);
        }
        Ok(effective)
    }

    /// Returns true if any of the requester's roles grants
    /// `resource:action`, `resource:*`, `*:action`, or `*:*`.
    pub fn check_permission(
        &self,
        requester_id: &str,
        resource: &str,
        action: &str,
    ) -> Result<bool, RbacError> {
        let effective = self.effective_permissions(requester_id)?;
        let allowed = effective.allows(resource, action);

        if self.audit_enabled {
            if allowed {
                info!(
                    requester = %requester_id,
                    resource,
                    action,
                    "RBAC permission granted"
                );
            } else {
                warn!(
                    requester = %requester_id,
                    resource,
                    action,
                    granted = effective.len(),
                    "RBAC permission denied"
                );
            }
        } else {
            debug!(requester = %requester_id, resource, action, allowed, "RBAC check");
        }

        Ok(allowed)
    }
}
