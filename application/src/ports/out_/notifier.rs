use async_trait::async_trait;

use domain::{GroupId, MatchEvent, MatchResult, ParticipantId, Score, SessionId};

/// Presentation collaborator: a pure observer of state changes. It issues no
/// commands back; user-initiated operations arrive through the in-ports.
#[async_trait]
pub trait MatchNotifier: Send + Sync {
    async fn clock_tick(
        &self,
        session_id: SessionId,
        remaining_secs: u64,
    );

    async fn score_changed(
        &self,
        session_id: SessionId,
        score: Score,
    );

    async fn session_finalized(
        &self,
        result: &MatchResult,
    );

    async fn rotation_computed(
        &self,
        group_id: GroupId,
        new_order: &[ParticipantId],
    );

    /// Everything else worth showing (pauses, substitutions, expiry).
    async fn session_event(
        &self,
        session_id: SessionId,
        event: &MatchEvent,
    );
}
