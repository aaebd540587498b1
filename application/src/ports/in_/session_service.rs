use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex as TokioMutex, RwLock};
use tracing::{debug, warn};

use domain::{
    GroupId, MatchAction, MatchConfig, MatchEffect, MatchError, MatchEvent, MatchResult, MatchSession, ParticipantId,
    SessionId, Side, Timestamp,
};

use crate::ServiceError;
use crate::ports::out_::{MatchNotifier, SessionStore, StorageError, TimeSource, Version};

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// Upper bound on any single storage call; a slow store degrades to
    /// "continue locally, retry later" instead of stalling match play.
    pub storage_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            storage_timeout: Duration::from_secs(2),
        }
    }
}

struct TrackedSession {
    session: MatchSession,
    version: Version,
    /// Last successful durable write, used to skip a periodic checkpoint
    /// that an interactive mutation has just superseded.
    last_persisted_at: Option<Timestamp>,
}

type SessionMap = RwLock<HashMap<SessionId, Arc<TokioMutex<TrackedSession>>>>;

/// Single logical writer per session: every mutation goes through the
/// session's own mutex, so goals, substitutions, clock transitions and the
/// periodic sync tick are serialized. Writes carry an optimistic version;
/// losing the version race to another device surfaces as `StaleWrite` and the
/// caller retries against the reloaded state.
pub struct SessionService {
    sessions: SessionMap,
    store: Arc<dyn SessionStore>,
    notifier: Arc<dyn MatchNotifier>,
    time: Arc<dyn TimeSource>,
    config: ServiceConfig,
}

impl SessionService {
    pub fn new(
        store: Arc<dyn SessionStore>,
        notifier: Arc<dyn MatchNotifier>,
        time: Arc<dyn TimeSource>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            store,
            notifier,
            time,
            config,
        }
    }

    /// Builds a session from the queue front and persists it before anything
    /// else may touch it.
    pub async fn create_session(
        &self,
        group_id: GroupId,
        side_a: Vec<ParticipantId>,
        side_b: Vec<ParticipantId>,
        config: MatchConfig,
    ) -> Result<SessionId, ServiceError> {
        let session = MatchSession::new(group_id, side_a, side_b, config)?;
        let session_id = session.id();
        let version = self
            .bounded(self.store.save_checkpoint(&session, Version::initial()))
            .await?;
        self.sessions.write().await.insert(
            session_id,
            Arc::new(TokioMutex::new(TrackedSession {
                session,
                version,
                last_persisted_at: None,
            })),
        );
        Ok(session_id)
    }

    pub async fn start(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<MatchEffect>, ServiceError> {
        self.apply(session_id, MatchAction::Start).await
    }

    pub async fn pause(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<MatchEffect>, ServiceError> {
        self.apply(session_id, MatchAction::Pause).await
    }

    pub async fn resume(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<MatchEffect>, ServiceError> {
        self.apply(session_id, MatchAction::Resume).await
    }

    pub async fn record_goal(
        &self,
        session_id: SessionId,
        side: Side,
        scorer: Option<ParticipantId>,
    ) -> Result<Vec<MatchEffect>, ServiceError> {
        self.apply(session_id, MatchAction::RecordGoal { side, scorer }).await
    }

    pub async fn undo_goal(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<MatchEffect>, ServiceError> {
        self.apply(session_id, MatchAction::UndoGoal).await
    }

    pub async fn begin_substitution(
        &self,
        session_id: SessionId,
        side: Side,
    ) -> Result<Vec<MatchEffect>, ServiceError> {
        self.apply(session_id, MatchAction::BeginSubstitution { side }).await
    }

    pub async fn complete_substitution(
        &self,
        session_id: SessionId,
        side: Side,
        player_out: ParticipantId,
        player_in: ParticipantId,
    ) -> Result<Vec<MatchEffect>, ServiceError> {
        self.apply(
            session_id,
            MatchAction::CompleteSubstitution {
                side,
                player_out,
                player_in,
            },
        )
        .await
    }

    pub async fn undo_substitution(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<MatchEffect>, ServiceError> {
        self.apply(session_id, MatchAction::UndoSubstitution).await
    }

    /// Irreversible; the result is not accepted until durably persisted, so a
    /// storage failure here is fatal to the call.
    pub async fn finalize(
        &self,
        session_id: SessionId,
        tie_break: Option<Side>,
    ) -> Result<MatchResult, ServiceError> {
        self.apply(session_id, MatchAction::Finalize { tie_break }).await?;
        let entry = self.entry(session_id).await?;
        let tracked = entry.lock().await;
        tracked
            .session
            .result()
            .ok_or(ServiceError::Match(MatchError::SessionClosed))
    }

    /// A read-only copy for presentation and reload recovery.
    pub async fn snapshot(
        &self,
        session_id: SessionId,
    ) -> Result<MatchSession, ServiceError> {
        let entry = self.entry(session_id).await?;
        let tracked = entry.lock().await;
        Ok(tracked.session.clone())
    }

    pub async fn apply(
        &self,
        session_id: SessionId,
        action: MatchAction,
    ) -> Result<Vec<MatchEffect>, ServiceError> {
        let entry = self.entry(session_id).await?;
        let mut tracked = entry.lock().await;
        let now = self.time.now();

        let effects = match action {
            MatchAction::ClockSync => self.apply_sync(session_id, &mut tracked, now).await?,
            _ => self.apply_interactive(session_id, &mut tracked, action, now).await?,
        };
        drop(tracked);

        self.notify(session_id, &effects).await;
        Ok(effects)
    }

    async fn apply_interactive(
        &self,
        session_id: SessionId,
        tracked: &mut TrackedSession,
        action: MatchAction,
        now: Timestamp,
    ) -> Result<Vec<MatchEffect>, ServiceError> {
        let mut working = tracked.session.clone();
        let effects = working.process_action(action, now)?;
        let finalizing = matches!(action, MatchAction::Finalize { .. });

        match self.bounded(self.store.save_checkpoint(&working, tracked.version)).await {
            Ok(version) => {
                tracked.session = working;
                tracked.version = version;
                tracked.last_persisted_at = Some(now);
            }
            Err(StorageError::StaleWrite { expected, actual }) => {
                // Another device won the race; adopt its state so the caller
                // retries against something current.
                warn!(?session_id, ?expected, ?actual, "interactive write rejected as stale");
                if let Ok(Some(fresh)) = self.bounded(self.store.load_session(session_id)).await {
                    tracked.session = fresh.value;
                    tracked.version = fresh.version;
                }
                return Err(StorageError::StaleWrite { expected, actual }.into());
            }
            Err(err @ StorageError::Unavailable(_)) => {
                if finalizing {
                    return Err(err.into());
                }
                // In-memory state stays authoritative; the next checkpoint
                // tick retries the write.
                warn!(?session_id, error = %err, "checkpoint write failed, continuing locally");
                tracked.session = working;
            }
        }
        Ok(effects)
    }

    async fn apply_sync(
        &self,
        session_id: SessionId,
        tracked: &mut TrackedSession,
        now: Timestamp,
    ) -> Result<Vec<MatchEffect>, ServiceError> {
        let effects = tracked.session.process_action(MatchAction::ClockSync, now)?;
        if !effects.iter().any(|e| matches!(e, MatchEffect::Checkpoint)) {
            return Ok(effects);
        }

        let interval = tracked.session.config().checkpoint_interval;
        let superseded = tracked
            .last_persisted_at
            .is_some_and(|at| now < at.plus(interval));
        if superseded {
            // An interactive mutation persisted fresher state than this tick
            // would; its write wins and this one is skipped.
            debug!(?session_id, "periodic checkpoint superseded by recent write");
            return Ok(effects);
        }

        match self.bounded(self.store.save_checkpoint(&tracked.session, tracked.version)).await {
            Ok(version) => {
                tracked.version = version;
                tracked.last_persisted_at = Some(now);
            }
            Err(StorageError::StaleWrite { expected, actual }) => {
                warn!(?session_id, ?expected, ?actual, "checkpoint rejected as stale, reloading");
                if let Ok(Some(fresh)) = self.bounded(self.store.load_session(session_id)).await {
                    tracked.session = fresh.value;
                    tracked.version = fresh.version;
                }
            }
            Err(err) => {
                warn!(?session_id, error = %err, "checkpoint write failed, retrying on next tick");
            }
        }
        Ok(effects)
    }

    async fn entry(
        &self,
        session_id: SessionId,
    ) -> Result<Arc<TokioMutex<TrackedSession>>, ServiceError> {
        if let Some(entry) = self.sessions.read().await.get(&session_id) {
            return Ok(Arc::clone(entry));
        }
        // Cold start after a restart: rebuild from the last checkpoint.
        let Some(stored) = self.bounded(self.store.load_session(session_id)).await? else {
            return Err(ServiceError::SessionNotFound(session_id));
        };
        let entry = Arc::new(TokioMutex::new(TrackedSession {
            session: stored.value,
            version: stored.version,
            last_persisted_at: None,
        }));
        let mut sessions = self.sessions.write().await;
        Ok(Arc::clone(sessions.entry(session_id).or_insert(entry)))
    }

    async fn notify(
        &self,
        session_id: SessionId,
        effects: &[MatchEffect],
    ) {
        for effect in effects {
            let MatchEffect::Notify(event) = effect else {
                continue;
            };
            match event {
                MatchEvent::ClockTick { remaining_secs } => {
                    self.notifier.clock_tick(session_id, *remaining_secs).await;
                }
                MatchEvent::ScoreChanged { score, .. } => {
                    self.notifier.score_changed(session_id, *score).await;
                }
                MatchEvent::GoalRevoked { score } => {
                    self.notifier.score_changed(session_id, *score).await;
                }
                MatchEvent::SessionFinalized(result) => {
                    self.notifier.session_finalized(result).await;
                }
                other => {
                    self.notifier.session_event(session_id, other).await;
                }
            }
        }
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
