use std::future::Future;
use std::sync::Arc;

use tracing::warn;

use domain::{GroupId, ParticipantId, QueueCommand, QueueOutcome, RotationQueue};

use crate::ServiceError;
use crate::ports::in_::ServiceConfig;
use crate::ports::out_::{QueueStore, StorageError};

const MAX_SNAPSHOT_RETRIES: u32 = 3;

/// Manual insert/remove path for the waiting line. Shares the queue's
/// optimistic version token with the rotation engine, so a manual edit and a
/// rotation can never silently overwrite one another.
pub struct QueueService {
    queues: Arc<dyn QueueStore>,
    config: ServiceConfig,
}

impl QueueService {
    pub fn new(
        queues: Arc<dyn QueueStore>,
        config: ServiceConfig,
    ) -> Self {
        Self { queues, config }
    }

    pub async fn join(
        &self,
        group_id: GroupId,
        player: ParticipantId,
    ) -> Result<QueueOutcome, ServiceError> {
        self.edit(group_id, QueueCommand::Join(player)).await
    }

    pub async fn leave(
        &self,
        group_id: GroupId,
        player: ParticipantId,
    ) -> Result<QueueOutcome, ServiceError> {
        self.edit(group_id, QueueCommand::Leave(player)).await
    }

    pub async fn current_order(
        &self,
        group_id: GroupId,
    ) -> Result<Vec<ParticipantId>, ServiceError> {
        let snapshot = self.bounded(self.queues.load_queue(group_id)).await?;
        Ok(snapshot.value)
    }

    async fn edit(
        &self,
        group_id: GroupId,
        command: QueueCommand,
    ) -> Result<QueueOutcome, ServiceError> {
        let mut last_conflict = None;
        for attempt in 0..MAX_SNAPSHOT_RETRIES {
            let snapshot = self.bounded(self.queues.load_queue(group_id)).await?;
            let mut queue = RotationQueue::from_order(snapshot.value)?;

            let outcome = queue.handle_command(command);
            if matches!(outcome, QueueOutcome::AlreadyQueued | QueueOutcome::NotQueued) {
                return Ok(outcome);
            }

            match self
                .bounded(self.queues.replace_queue(group_id, queue.order().to_vec(), snapshot.version))
                .await
            {
                Ok(_) => return Ok(outcome),
                Err(StorageError::StaleWrite { expected, actual }) => {
                    warn!(?group_id, attempt, "queue edit raced another writer, retrying");
                    last_conflict = Some(StorageError::StaleWrite { expected, actual });
                }
                Err(err) => return Err(err.into()),
            }
        }
        Err(last_conflict
            .unwrap_or_else(|| StorageError::Unavailable("queue edit retries exhausted".into()))
            .into())
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, StorageError>>,
    ) -> Result<T, StorageError> {
        match tokio::time::timeout(self.config.storage_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(StorageError::Unavailable("storage call timed out".into())),
        }
    }
}
