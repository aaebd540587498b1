use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use domain::{GroupId, MatchSession, ParticipantId, SessionId, WinStreak};

/// Optimistic concurrency token. Every durable write names the version it was
/// based on; the store rejects the write when that no longer matches.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version(pub u64);

impl Version {
    /// Expected version when creating a resource that does not exist yet.
    #[must_use]
    pub fn initial() -> Self {
        Self(0)
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub value: T,
    pub version: Version,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("stale write: based on {expected:?}, store has {actual:?}")]
    StaleWrite { expected: Version, actual: Version },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load_session(
        &self,
        session_id: SessionId,
    ) -> Result<Option<Versioned<MatchSession>>, StorageError>;

    /// Idempotent durable snapshot; `expected` is `Version::initial()` for a
    /// session being persisted for the first time.
    async fn save_checkpoint(
        &self,
        session: &MatchSession,
        expected: Version,
    ) -> Result<Version, StorageError>;
}

#[async_trait]
pub trait QueueStore: Send + Sync {
    async fn load_queue(
        &self,
        group_id: GroupId,
    ) -> Result<Versioned<Vec<ParticipantId>>, StorageError>;

    /// Full replacement of the ordering, never a partial delta.
    async fn replace_queue(
        &self,
        group_id: GroupId,
        new_order: Vec<ParticipantId>,
        expected: Version,
    ) -> Result<Version, StorageError>;
}

#[async_trait]
pub trait StreakStore: Send + Sync {
    async fn load_streak(
        &self,
        group_id: GroupId,
    ) -> Result<WinStreak, StorageError>;

    async fn save_streak(
        &self,
        group_id: GroupId,
        streak: &WinStreak,
    ) -> Result<(), StorageError>;
}
