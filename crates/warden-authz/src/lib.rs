//! # warden-authz: Authorization Gate and Migration Coverage
//!
//! Ties the ABAC evaluator and the legacy RBAC checker together:
//!
//! - [`AuthorizationGate`] asks ABAC first and, unless the deployment is
//!   ABAC-only, falls back to role grants when ABAC denies.
//! - [`CoverageAnalyzer`] reports which RBAC permissions still lack an ABAC
//!   policy, so the fallback can eventually be switched off.
//!
//! ## Examples
//!
//! ```
//! use std::sync::Arc;
//! use warden_abac::{Effect, Evaluator, InMemoryPolicyStore, PolicyCache, PolicyDraft,
//!     PolicyRepository, RequesterAttributes};
//! use warden_authz::{AuthorizationGate, DecisionPath};
//! use warden_rbac::{InMemoryRoleStore, RbacChecker, Role};
//!
//! let policies = Arc::new(InMemoryPolicyStore::new());
//! policies.insert_policy(
//!     PolicyDraft::new("admins", Effect::Allow, "role:admin", "*", "*"),
//!     chrono::Utc::now(),
//! )?;
//!
//! let mut roles = InMemoryRoleStore::new();
//! roles.add_role(Role::new("viewer").grant("report:read"));
//! roles.assign("7", "viewer");
//!
//! let gate = AuthorizationGate::new(
//!     Evaluator::new(Arc::new(PolicyCache::new(policies))),
//!     RbacChecker::new(Arc::new(roles)),
//! );
//!
//! let viewer = RequesterAttributes::new("7", "vic");
//! let decision = gate.authorize(&viewer, "report", "read")?;
//! assert_eq!(decision.path, DecisionPath::RbacFallback);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod coverage;
pub mod error;
pub mod gate;

pub use coverage::{CoverageAnalyzer, CoverageReport, MissingPolicy, RoleCoverage, analyze};
pub use error::{AuthzError, Result};
pub use gate::{AuthorizationGate, DecisionPath, GateDecision};
