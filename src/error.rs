//! Store failures.
//!
//! `InvalidArgument` and `NotFound` are the caller's to handle. Anything else is
//! `Internal`: logged where it happens and reported to clients only as a
//! generic failure.

use thiserror::Error;

use crate::entrant::{EntrantId, Field};

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Caller-supplied data violates a precondition
    #[error("invalid argument: {0} can not be blank")]
    InvalidArgument(Field),

    /// No record with this id exists
    #[error("entrant with id = {0} not found")]
    NotFound(EntrantId),

    /// Lock poisoning, allocator exhaustion or a broken store invariant
    #[error("internal store failure: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn internal(msg: impl Into<String>) -> Self {
        StoreError::Internal(msg.into())
    }
}

impl From<Field> for StoreError {
    fn from(field: Field) -> Self {
        StoreError::InvalidArgument(field)
    }
}
