//! Policy storage.
//!
//! The evaluator only needs [`PolicyStore::list_enabled_policies`]. The
//! ordering it returns is a contract on every implementation:
//!
//! 1. disabled policies are excluded
//! 2. priority descending
//! 3. creation time ascending
//!
//! [`PolicyRepository`] adds the write side used by
//! [`PolicyAdmin`](crate::admin::PolicyAdmin).

use std::cmp::Reverse;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use warden_types::PolicyId;

use crate::error::StoreError;
use crate::policy::{Policy, PolicyDraft};

/// Read access to stored policies.
pub trait PolicyStore: Send + Sync {
    /// Enabled policies, priority descending then creation time ascending.
    fn list_enabled_policies(&self) -> Result<Vec<Policy>, StoreError>;

    /// Every policy, enabled or not, in storage order.
    fn list_policies(&self) -> Result<Vec<Policy>, StoreError>;
}

/// Read and write access to stored policies.
pub trait PolicyRepository: PolicyStore {
    fn get_policy(&self, id: PolicyId) -> Result<Policy, StoreError>;

    fn insert_policy(&self, draft: PolicyDraft, now: DateTime<Utc>) -> Result<Policy, StoreError>;

    fn update_policy(
        &self,
        id: PolicyId,
        draft: PolicyDraft,
        now: DateTime<Utc>,
    ) -> Result<Policy, StoreError>;

    fn set_policy_enabled(
        &self,
        id: PolicyId,
        enabled: bool,
        now: DateTime<Utc>,
    ) -> Result<Policy, StoreError>;

    /// Removes a policy and returns it.
    fn delete_policy(&self, id: PolicyId) -> Result<Policy, StoreError>;
}

/// Sorts policies into evaluation order. The sort is stable, so policies
/// with equal priority and creation time keep their input order.
pub fn sort_for_evaluation(policies: &mut [Policy]) {
    policies.sort_by_key(|p| (Reverse(p.priority), p.created_at));
}

// ============================================================================
// In-memory store
// ============================================================================

#[derive(Debug)]
struct Inner {
    /// Insertion order.
    policies: Vec<Policy>,
    next_id: PolicyId,
}

/// A [`PolicyRepository`] held entirely in memory.
#[derive(Debug)]
pub struct InMemoryPolicyStore {
    inner: RwLock<Inner>,
}

impl InMemoryPolicyStore {
    pub fn new() -> Self {
        Self::with_policies(Vec::new())
    }

    /// Seeds the store with existing policies, e.g. loaded from a fixture.
    /// New ids continue after the largest seeded id.
    pub fn with_policies(policies: Vec<Policy>) -> Self {
        let next_id = policies
            .iter()
            .map(|p| p.id)
            .max()
            .map_or(PolicyId::new(1), PolicyId::next);
        Self {
            inner: RwLock::new(Inner { policies, next_id }),
        }
    }

    pub fn len(&self) -> usize {
        self.read().policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn modify(
        &self,
        id: PolicyId,
        change: impl FnOnce(&mut Policy),
    ) -> Result<Policy, StoreError> {
        let mut inner = self.write();
        let policy = inner
            .policies
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::PolicyNotFound(id))?;
        change(policy);
        Ok(policy.clone())
    }
}

impl Default for InMemoryPolicyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyStore for InMemoryPolicyStore {
    fn list_enabled_policies(&self) -> Result<Vec<Policy>, StoreError> {
        let mut enabled: Vec<Policy> = self
            .read()
            .policies
            .iter()
            .filter(|p| p.enabled)
            .cloned()
            .collect();
        sort_for_evaluation(&mut enabled);
        Ok(enabled)
    }

    fn list_policies(&self) -> Result<Vec<Policy>, StoreError> {
        Ok(self.read().policies.clone())
    }
}

impl PolicyRepository for InMemoryPolicyStore {
    fn get_policy(&self, id: PolicyId) -> Result<Policy, StoreError> {
        self.read()
            .policies
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(StoreError::PolicyNotFound(id))
    }

    fn insert_policy(&self, draft: PolicyDraft, now: DateTime<Utc>) -> Result<Policy, StoreError> {
        let mut inner = self.write();
        let id = inner.next_id;
        inner.next_id = id.next();
        let policy = draft.into_policy(id, now);
        inner.policies.push(policy.clone());
        Ok(policy)
    }

    fn update_policy(
        &self,
        id: PolicyId,
        draft: PolicyDraft,
        now: DateTime<Utc>,
    ) -> Result<Policy, StoreError> {
        self.modify(id, |policy| draft.apply_to(policy, now))
    }

    fn set_policy_enabled(
        &self,
        id: PolicyId,
        enabled: bool,
        now: DateTime<Utc>,
    ) -> Result<Policy, StoreError> {
        self.modify(id, |policy| {
            policy.enabled = enabled;
            policy.updated_at = now;
        })
    }

    fn delete_policy(&self, id: PolicyId) -> Result<Policy, StoreError> {
        let mut inner = self.write();
        let index = inner
            .policies
            .iter()
            .position(|p| p.id == id)
            .ok_or(StoreError::PolicyNotFound(id))?;
        Ok(inner.policies.remove(index))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Effect;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 0, 0).unwrap()
    }

    fn draft(name: &str, priority: i32) -> PolicyDraft {
        PolicyDraft::new(name, Effect::Allow, "*", "*", "*").with_priority(priority)
    }

    fn names(policies: &[Policy]) -> Vec<&str> {
        policies.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_enabled_listing_order() {
        let store = InMemoryPolicyStore::new();
        store.insert_policy(draft("low", 1), t0()).unwrap();
        store
            .insert_policy(draft("high-late", 10), t0() + Duration::seconds(5))
            .unwrap();
        store.insert_policy(draft("high-early", 10), t0()).unwrap();
        store
            .insert_policy(draft("high-early-2", 10), t0())
            .unwrap();

        let listed = store.list_enabled_policies().unwrap();
        assert_eq!(
            names(&listed),
            vec!["high-early", "high-early-2", "high-late", "low"]
        );
    }

    #[test]
    fn test_enabled_listing_skips_disabled() {
        let store = InMemoryPolicyStore::new();
        store.insert_policy(draft("on", 1), t0()).unwrap();
        store.insert_policy(draft("off", 5).disabled(), t0()).unwrap();

        assert_eq!(names(&store.list_enabled_policies().unwrap()), vec!["on"]);
        assert_eq!(store.list_policies().unwrap().len(), 2);
    }

    #[test]
    fn test_ids_are_sequential_and_continue_after_seed() {
        let seeded = draft("seed", 0).into_policy(PolicyId::new(41), t0());
        let store = InMemoryPolicyStore::with_policies(vec![seeded]);

        let created = store.insert_policy(draft("new", 0), t0()).unwrap();
        assert_eq!(created.id, PolicyId::new(42));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_update_and_toggle() {
        let store = InMemoryPolicyStore::new();
        let created = store.insert_policy(draft("a", 1), t0()).unwrap();
        let later = t0() + Duration::minutes(1);

        let updated = store
            .update_policy(created.id, draft("b", 7), later)
            .unwrap();
        assert_eq!(updated.name, "b");
        assert_eq!(updated.priority, 7);
        assert_eq!(updated.created_at, t0());
        assert_eq!(updated.updated_at, later);

        let disabled = store.set_policy_enabled(created.id, false, later).unwrap();
        assert!(!disabled.enabled);
        assert!(store.list_enabled_policies().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_ids_are_not_found() {
        let store = InMemoryPolicyStore::new();
        let missing = PolicyId::new(99);

        assert_eq!(
            store.get_policy(missing),
            Err(StoreError::PolicyNotFound(missing))
        );
        assert_eq!(
            store.update_policy(missing, draft("x", 0), t0()),
            Err(StoreError::PolicyNotFound(missing))
        );
        assert_eq!(
            store.delete_policy(missing),
            Err(StoreError::PolicyNotFound(missing))
        );
    }

    #[test]
    fn test_delete_returns_removed_policy() {
        let store = InMemoryPolicyStore::new();
        let created = store.insert_policy(draft("gone", 0), t0()).unwrap();

        let removed = store.delete_policy(created.id).unwrap();
        assert_eq!(removed.name, "gone");
        assert!(store.is_empty());
    }
}
