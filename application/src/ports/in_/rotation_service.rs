use std::sync::Arc;

use tracing::{info, warn};

use domain::{MatchResult, Rotation, RotationQueue, rotate};

use crate::ServiceError;
use crate::ports::in_::ServiceConfig;
use crate::ports::out_::{MatchNotifier, QueueStore, StorageError, StreakStore};

/// How many fresh snapshots to try when a manual queue edit races the
/// rotation write.
const MAX_SNAPSHOT_RETRIES: u32 = 3;

/// Applies the post-match queue rotation: read the streak and a versioned
/// queue snapshot, compute the pure rotation, then write the full replacement
/// ordering back under the snapshot's version token. A concurrent manual edit
/// shows up as `StaleWrite` and the whole read-compute-write is retried on a
/// fresh snapshot, so no manual edit is ever silently undone.
///
/// Unlike the periodic clock checkpoint, nothing here may be swallowed: a
/// rotation is not "applied" until it is durably persisted.
pub struct RotationService {
    queues: Arc<dyn QueueStore>,
    streaks: Arc<dyn StreakStore>,
    notifier: Arc<dyn MatchNotifier>,
    config: ServiceConfig,
}

impl RotationService {
    pub fn new(
        queues: Arc<dyn QueueStore>,
        streaks: Arc<dyn StreakStore>,
        notifier: Arc<dyn MatchNotifier>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            queues,
            streaks,
            notifier,
            config,
        }
    }

    pub async fn apply(
        &self,
        result: &MatchResult,
    ) -> Result<Rotation, ServiceError> {
        let group_id = result.group_id;
        let mut last_conflict = None;

        for attempt in 0..MAX_SNAPSHOT_RETRIES {
            let streak = self.bounded(self.streaks.load_streak(group_id)).await?;
            let snapshot = self.bounded(self.queues.load_queue(group_id)).await?;
            let queue = RotationQueue::from_order(snapshot.value)?;

            // Pure and replayable; InsufficientQueue surfaces before any
            // write and leaves both the queue and the finalized record alone.
            let rotation = rotate(result, streak, &queue)?;

            match self
                .bounded(self.queues.replace_queue(group_id, rotation.new_order.clone(), snapshot.version))
                .await
            {
                Ok(_) => {
                    self.bounded(self.streaks.save_streak(group_id, &rotation.streak)).await?;
                    info!(
                        ?group_id,
                        streak = rotation.streak.count(),
                        queued = rotation.new_order.len(),
                        "rotation applied"
                    );
                    self.notifier.rotation_computed(group_id, &rotation.new_order).await;
                    return Ok(rotation);
                }
                Err(StorageError::StaleWrite { expected, actual }) => {
                    warn!(?group_id, attempt, ?expected, ?actual, "queue changed under rotation, retrying");
                    last_conflict = Some(StorageError::StaleWrite { expected, actual });
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(last_conflict
            .unwrap_or_else(|| StorageError::Unavailable("rotation retries exhausted".into()))
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
