//! Error types for role lookup and permission checks.

use thiserror::Error;

/// Errors surfaced by a [`RoleStore`](crate::store::RoleStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleStoreError {
    /// A requester was assigned a role that does not exist.
    #[error("Role '{0}' not found")]
    RoleNotFound(String),

    /// The backing store could not be reached.
    #[error("Role store unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by the RBAC checker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RbacError {
    /// The permission check was given an empty requester id.
    #[error("RBAC check requires a requester id")]
    MissingIdentity,

    #[error(transparent)]
    Store(#[from] RoleStoreError),
}
