//! # warden-rbac: Role-Based Access Control
//!
//! The legacy permission model kept alongside ABAC during migration:
//! - **Permissions**: `"<resource>:<action>"` codes, with `*` in either slot
//! - **Roles**: named, flat permission sets
//! - **Role store**: requester → roles lookup and the permission catalogue
//! - **Checker**: the fallback decision used by the authorization gate
//!
//! ## Grant Matching
//!
//! A request for `(resource, action)` is granted when any assigned role holds
//! one of:
//!
//! | Code                  | Meaning                           |
//! |-----------------------|-----------------------------------|
//! | `resource:action`     | exactly this permission           |
//! | `resource:*`          | every action on this resource     |
//! | `*:action`            | this action on every resource     |
//! | `*:*`                 | everything                        |
//!
//! ## Examples
//!
//! ```
//! use std::sync::Arc;
//! use warden_rbac::{InMemoryRoleStore, RbacChecker, Role};
//!
//! let mut store = InMemoryRoleStore::new();
//! store.add_role(Role::new("viewer").grant("user:read"));
//! store.assign("42", "viewer");
//!
//! let checker = RbacChecker::new(Arc::new(store));
//! assert!(checker.check_permission("42", "user", "read")?);
//! assert!(!checker.check_permission("42", "user", "delete")?);
//! # Ok::<(), warden_rbac::RbacError>(())
//! ```

pub mod enforcement;
pub mod error;
pub mod permissions;
pub mod roles;
pub mod store;

pub use enforcement::RbacChecker;
pub use error::{RbacError, RoleStoreError};
pub use permissions::{Permission, PermissionSet};
pub use roles::Role;
pub use store::{InMemoryRoleStore, RoleCatalog, RoleStore};
