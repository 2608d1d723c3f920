//! # warden-abac: Attribute-Based Access Control
//!
//! Decides whether a requester may perform an action on a resource by
//! walking an ordered list of stored policies. The first policy whose
//! subject, resource, action, and conditions all match decides; if none
//! matches, access is denied.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Access Request                             │
//! │  (Requester Attributes + Resource + Action) │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  Evaluator                                  │
//! │  ├─ Deny non-ACTIVE requesters              │
//! │  ├─ Load policies through the TTL cache     │
//! │  ├─ Match subject / resource / action       │
//! │  ├─ Check conditions (time window)          │
//! │  └─ First match decides, else deny          │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  EvaluationResult                           │
//! │  - allowed                                  │
//! │  - matched policy                           │
//! │  - human-readable reason                    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Pattern Language
//!
//! | Field    | Forms                                                              |
//! |----------|--------------------------------------------------------------------|
//! | subject  | `*`, `role:`, `user:`, `department:`, `status:`, `email:`, literal |
//! | resource | `*`, `p:*`, `*:s`, `p:*:s`, literal                                |
//! | action   | `*`, `a,b,c`, literal                                              |
//!
//! ## Examples
//!
//! ```
//! use std::sync::Arc;
//! use warden_abac::{
//!     Effect, Evaluator, InMemoryPolicyStore, PolicyAdmin, PolicyCache, PolicyDraft,
//!     RequesterAttributes,
//! };
//!
//! let cache = Arc::new(PolicyCache::new(Arc::new(InMemoryPolicyStore::new())));
//! let admin = PolicyAdmin::new(Arc::clone(&cache));
//! admin
//!     .create(PolicyDraft::new("no-deletes", Effect::Deny, "*", "*", "delete").with_priority(200))
//!     .unwrap();
//! admin
//!     .create(PolicyDraft::new("admins", Effect::Allow, "role:admin", "*", "*").with_priority(100))
//!     .unwrap();
//!
//! let evaluator = Evaluator::new(cache);
//! let alice = RequesterAttributes::new("1", "alice").with_role("admin");
//!
//! assert!(evaluator.evaluate(&alice, "user", "create").unwrap());
//! assert!(!evaluator.evaluate(&alice, "user", "delete").unwrap());
//! ```

pub mod admin;
pub mod attributes;
pub mod cache;
pub mod conditions;
pub mod error;
pub mod evaluator;
pub mod lint;
pub mod matcher;
pub mod pattern;
pub mod policy;
pub mod store;

pub use admin::PolicyAdmin;
pub use attributes::RequesterAttributes;
pub use cache::{DEFAULT_TTL_SECS, PolicyCache, PolicySnapshot};
pub use conditions::{PolicyConditions, TimeCondition, TimeOfDay};
pub use error::{AbacError, StoreError};
pub use evaluator::{AccessRequest, EvaluationResult, Evaluator, Outcome, decide};
pub use lint::{LintFinding, LintKind, PatternForms, Severity, lint_policies, pattern_forms};
pub use pattern::{ActionPattern, ResourcePattern, SubjectPattern};
pub use policy::{CompiledPolicy, Effect, Policy, PolicyDraft};
pub use store::{InMemoryPolicyStore, PolicyRepository, PolicyStore, sort_for_evaluation};
