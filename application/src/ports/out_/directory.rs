use async_trait::async_trait;

use domain::ParticipantId;

/// Roster lookup collaborator. The core stores identifiers only; names are
/// resolved at the presentation edge.
#[async_trait]
pub trait ParticipantDirectory: Send + Sync {
    async fn resolve_name(
        &self,
        participant_id: ParticipantId,
    ) -> Option<String>;
}
