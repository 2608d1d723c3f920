//! Policy administration.
//!
//! Every successful write goes through [`PolicyAdmin`], which invalidates the
//! shared [`PolicyCache`] so the next evaluation sees the change.

use std::sync::Arc;

use tracing::info;
use warden_types::PolicyId;

use crate::cache::PolicyCache;
use crate::error::AbacError;
use crate::policy::{Policy, PolicyDraft};
use crate::store::PolicyRepository;

/// Write access to policies, kept coherent with the evaluation cache.
#[derive(Debug)]
pub struct PolicyAdmin<R: PolicyRepository> {
    cache: Arc<PolicyCache<R>>,
}

impl<R: PolicyRepository> PolicyAdmin<R> {
    /// Wraps the cache shared with the evaluator. Writes go to the cache's
    /// store.
    pub fn new(cache: Arc<PolicyCache<R>>) -> Self {
        Self { cache }
    }

    pub fn get(&self, id: PolicyId) -> Result<Policy, AbacError> {
        Ok(self.repo().get_policy(id)?)
    }

    /// Every policy, enabled or not.
    pub fn list(&self) -> Result<Vec<Policy>, AbacError> {
        Ok(self.repo().list_policies()?)
    }

    pub fn create(&self, draft: PolicyDraft) -> Result<Policy, AbacError> {
        let policy = self.repo().insert_policy(draft, self.cache.clock().now())?;
        self.cache.invalidate();
        info!(
            policy_id = %policy.id,
            name = %policy.name,
            priority = policy.priority,
            "Policy created"
        );
        Ok(policy)
    }

    pub fn update(&self, id: PolicyId, draft: PolicyDraft) -> Result<Policy, AbacError> {
        let policy = self
            .repo()
            .update_policy(id, draft, self.cache.clock().now())?;
        self.cache.invalidate();
        info!(policy_id = %id, name = %policy.name, "Policy updated");
        Ok(policy)
    }

    pub fn enable(&self, id: PolicyId) -> Result<Policy, AbacError> {
        self.set_enabled(id, true)
    }

    pub fn disable(&self, id: PolicyId) -> Result<Policy, AbacError> {
        self.set_enabled(id, false)
    }

    pub fn delete(&self, id: PolicyId) -> Result<Policy, AbacError> {
        let policy = self.repo().delete_policy(id)?;
        self.cache.invalidate();
        info!(policy_id = %id, name = %policy.name, "Policy deleted");
        Ok(policy)
    }

    fn set_enabled(&self, id: PolicyId, enabled: bool) -> Result<Policy, AbacError> {
        let policy = self
            .repo()
            .set_policy_enabled(id, enabled, self.cache.clock().now())?;
        self.cache.invalidate();
        info!(policy_id = %id, name = %policy.name, enabled, "Policy toggled");
        Ok(policy)
    }

    fn repo(&self) -> &R {
        self.cache.store()
    }
}

// ============================================================================
// Tests
// ============================================================================
