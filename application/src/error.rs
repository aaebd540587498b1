use thiserror::Error;

use domain::{MatchError, RotationError, SessionId};

use crate::ports::out_::StorageError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    #[error("session {0:?} not found")]
    SessionNotFound(SessionId),

    /// State-machine violation: surfaced synchronously, never retried.
    #[error(transparent)]
    Match(#[from] MatchError),

    /// Retryable once the queue collaborator reports enough players, or after
    /// a fresh snapshot for a version conflict.
    #[error(transparent)]
    Rotation(#[from] RotationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ServiceError {
    /// Conflicts the caller resolves by reloading and retrying the whole
    /// operation.
    #[must_use]
    pub fn is_stale_write(&self) -> bool {
        matches!(self, ServiceError::Storage(StorageError::StaleWrite { .. }))
    }
}
