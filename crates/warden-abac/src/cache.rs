//! Time-boxed cache of the enabled, compiled policy list.
//!
//! The cached list is an immutable snapshot (`Arc<[CompiledPolicy]>`) that is
//! replaced wholesale on refresh, so readers never observe a partial update.
//!
//! Every invalidation bumps a generation counter. A refresh that started
//! before an invalidation still returns its result to its own caller but is
//! not installed, so no read after [`PolicyCache::invalidate`] can be served
//! pre-invalidation data.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Duration, Utc};
use tracing::debug;
use warden_types::{Clock, SystemClock};

use crate::error::StoreError;
use crate::policy::CompiledPolicy;
use crate::store::PolicyStore;

/// Default time-to-live for a fetched policy list, in seconds.
pub const DEFAULT_TTL_SECS: i64 = 60;

/// An immutable, evaluation-ordered list of enabled policies.
pub type PolicySnapshot = Arc<[CompiledPolicy]>;

#[derive(Debug)]
struct CacheEntry {
    policies: PolicySnapshot,
    fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    /// A clock that moved backwards makes the entry stale.
    fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let age = now - self.fetched_at;
        age >= Duration::zero() && age < ttl
    }
}

#[derive(Debug, Default)]
struct CacheState {
    entry: Option<CacheEntry>,
    generation: u64,
}

/// Caches the output of [`PolicyStore::list_enabled_policies`].
pub struct PolicyCache<S: PolicyStore> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    state: RwLock<CacheState>,
}

impl<S: PolicyStore> PolicyCache<S> {
    /// Creates a cache with the default TTL and the system clock.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_clock(
            store,
            Arc::new(SystemClock),
            Duration::seconds(DEFAULT_TTL_SECS),
        )
    }

    pub fn with_clock(store: Arc<S>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            store,
            clock,
            ttl,
            state: RwLock::new(CacheState::default()),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the enabled policies in evaluation order.
    ///
    /// Served from memory when fetched less than one TTL ago; otherwise
    /// fetched from the store, compiled, and cached.
    pub fn get_policies(&self) -> Result<PolicySnapshot, StoreError> {
        let now = self.clock.now();

        let generation = {
            let state = self.read_state();
            if let Some(entry) = &state.entry
                && entry.is_fresh(now, self.ttl)
            {
                debug!(policies = entry.policies.len(), "Policy cache hit");
                return Ok(Arc::clone(&entry.policies));
            }
            state.generation
        };

        let fetched = self.store.list_enabled_policies()?;
        let snapshot: PolicySnapshot = fetched
            .into_iter()
            .filter(|policy| policy.enabled)
            .map(CompiledPolicy::compile)
            .collect();

        let mut state = self.write_state();
        if state.generation == generation {
            state.entry = Some(CacheEntry {
                policies: Arc::clone(&snapshot),
                fetched_at: now,
            });
            debug!(policies = snapshot.len(), "Policy cache refreshed");
        } else {
            debug!("Policy cache invalidated during refresh; result not cached");
        }

        Ok(snapshot)
    }

    /// Drops the cached list. The next read always goes to the store.
    pub fn invalidate(&self) {
        let mut state = self.write_state();
        state.entry = None;
        state.generation = state.generation.wrapping_add(1);
        debug!(generation = state.generation, "Policy cache invalidated");
    }

    /// Returns true if a list is cached and still within its TTL.
    pub fn is_warm(&self) -> bool {
        let now = self.clock.now();
        self.read_state()
            .entry
            .as_ref()
            .is_some_and(|entry| entry.is_fresh(now, self.ttl))
    }

    // The guarded state is only ever replaced whole, so a poisoned lock
    // still holds a consistent value.
    fn read_state(&self) -> RwLockReadGuard<'_, CacheState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, CacheState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: PolicyStore> std::fmt::Debug for PolicyCache<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyCache")
            .field("ttl", &self.ttl)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
