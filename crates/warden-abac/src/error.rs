//! Error types for policy storage and evaluation.
//!
//! Denial is not an error: an evaluation that does not grant access returns
//! an [`EvaluationResult`](crate::evaluator::EvaluationResult) with
//! `allowed == false`.

use thiserror::Error;
use warden_types::PolicyId;

/// Errors surfaced by a [`PolicyStore`](crate::store::PolicyStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No policy exists with the given id.
    #[error("Policy {0} not found")]
    PolicyNotFound(PolicyId),

    /// The backing store could not be reached.
    #[error("Policy store unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by the evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbacError {
    /// The requester has neither an id nor a username.
    #[error("Requester attributes must carry an id or a username")]
    MissingIdentity,

    /// Loading policies failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
