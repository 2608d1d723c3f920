//! Error types for the authorization gate and coverage analysis.

use thiserror::Error;
use warden_abac::{AbacError, StoreError};
use warden_rbac::{RbacError, RoleStoreError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthzError {
    #[error("ABAC evaluation failed: {0}")]
    Abac(#[from] AbacError),

    #[error("RBAC fallback failed: {0}")]
    Rbac(#[from] RbacError),

    #[error("Loading policies failed: {0}")]
    PolicyStore(#[from] StoreError),

    #[error("Loading roles failed: {0}")]
    RoleStore(#[from] RoleStoreError),
}

pub type Result<T> = std::result::Result<T, AuthzError>;
