use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use application::ports::out_::{
    MatchNotifier, ParticipantDirectory, QueueStore, SessionStore, StorageError, StreakStore, TimeSource, Version,
    Versioned,
};
use domain::{GroupId, MatchEvent, MatchResult, MatchSession, ParticipantId, Score, SessionId, Timestamp, WinStreak};

/// Versioned in-memory stores, with a toggle that makes every call fail as
/// `Unavailable` to exercise the degrade paths.
pub struct InMemoryStore {
    sessions: RwLock<HashMap<SessionId, Versioned<MatchSession>>>,
    queues: RwLock<HashMap<GroupId, Versioned<Vec<ParticipantId>>>>,
    streaks: RwLock<HashMap<GroupId, WinStreak>>,
    unavailable: AtomicBool,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            queues: RwLock::new(HashMap::new()),
            streaks: RwLock::new(HashMap::new()),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn set_unavailable(
        &self,
        unavailable: bool,
    ) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn seed_queue(
        &self,
        group_id: GroupId,
        order: Vec<ParticipantId>,
    ) {
        self.queues.write().unwrap().insert(
            group_id,
            Versioned {
                value: order,
                version: Version(1),
            },
        );
    }

    /// Persisted checkpoint as the store sees it, for assertions.
    #[must_use]
    pub fn stored_session(
        &self,
        session_id: SessionId,
    ) -> Option<Versioned<MatchSession>> {
        self.sessions.read().unwrap().get(&session_id).cloned()
    }

    #[must_use]
    pub fn stored_queue(
        &self,
        group_id: GroupId,
    ) -> Option<Versioned<Vec<ParticipantId>>> {
        self.queues.read().unwrap().get(&group_id).cloned()
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("injected outage".into()));
        }
        Ok(())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn load_session(
        &self,
        session_id: SessionId,
    ) -> Result<Option<Versioned<MatchSession>>, StorageError> {
        self.check_available()?;
        Ok(self.sessions.read().unwrap().get(&session_id).cloned())
    }

    async fn save_checkpoint(
        &self,
        session: &MatchSession,
        expected: Version,
    ) -> Result<Version, StorageError> {
        self.check_available()?;
        let mut sessions = self.sessions.write().unwrap();
        let current = sessions.get(&session.id()).map(|s| s.version).unwrap_or_default();
        if current != expected {
            return Err(StorageError::StaleWrite {
                expected,
                actual: current,
            });
        }
        let version = current.next();
        sessions.insert(
            session.id(),
            Versioned {
                value: session.clone(),
                version,
            },
        );
        Ok(version)
    }
}

#[async_trait]
impl QueueStore for InMemoryStore {
    async fn load_queue(
        &self,
        group_id: GroupId,
    ) -> Result<Versioned<Vec<ParticipantId>>, StorageError> {
        self.check_available()?;
        Ok(self
            .queues
            .read()
            .unwrap()
            .get(&group_id)
            .cloned()
            .unwrap_or(Versioned {
                value: Vec::new(),
                version: Version::initial(),
            }))
    }

    async fn replace_queue(
        &self,
        group_id: GroupId,
        new_order: Vec<ParticipantId>,
        expected: Version,
    ) -> Result<Version, StorageError> {
        self.check_available()?;
        let mut queues = self.queues.write().unwrap();
        let current = queues.get(&group_id).map(|q| q.version).unwrap_or_default();
        if current != expected {
            return Err(StorageError::StaleWrite {
                expected,
                actual: current,
            });
        }
        let version = current.next();
        queues.insert(
            group_id,
            Versioned {
                value: new_order,
                version,
            },
        );
        Ok(version)
    }
}

#[async_trait]
impl StreakStore for InMemoryStore {
    async fn load_streak(
        &self,
        group_id: GroupId,
    ) -> Result<WinStreak, StorageError> {
        self.check_available()?;
        Ok(self.streaks.read().unwrap().get(&group_id).copied().unwrap_or_default())
    }

    async fn save_streak(
        &self,
        group_id: GroupId,
        streak: &WinStreak,
    ) -> Result<(), StorageError> {
        self.check_available()?;
        self.streaks.write().unwrap().insert(group_id, *streak);
        Ok(())
    }
}

/// Captures every notification for assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    ticks: RwLock<Vec<(SessionId, u64)>>,
    scores: RwLock<Vec<(SessionId, Score)>>,
    finalized: RwLock<Vec<MatchResult>>,
    rotations: RwLock<Vec<(GroupId, Vec<ParticipantId>)>>,
    events: RwLock<Vec<(SessionId, MatchEvent)>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn ticks(&self) -> Vec<(SessionId, u64)> {
        self.ticks.read().unwrap().clone()
    }

    #[must_use]
    pub fn scores(&self) -> Vec<(SessionId, Score)> {
        self.scores.read().unwrap().clone()
    }

    #[must_use]
    pub fn finalized(&self) -> Vec<MatchResult> {
        self.finalized.read().unwrap().clone()
    }

    #[must_use]
    pub fn rotations(&self) -> Vec<(GroupId, Vec<ParticipantId>)> {
        self.rotations.read().unwrap().clone()
    }

    #[must_use]
    pub fn events(&self) -> Vec<(SessionId, MatchEvent)> {
        self.events.read().unwrap().clone()
    }
}

#[async_trait]
impl MatchNotifier for RecordingNotifier {
    async fn clock_tick(
        &self,
        session_id: SessionId,
        remaining_secs: u64,
    ) {
        self.ticks.write().unwrap().push((session_id, remaining_secs));
    }

    async fn score_changed(
        &self,
        session_id: SessionId,
        score: Score,
    ) {
        self.scores.write().unwrap().push((session_id, score));
    }

    async fn session_finalized(
        &self,
        result: &MatchResult,
    ) {
        self.finalized.write().unwrap().push(result.clone());
    }

    async fn rotation_computed(
        &self,
        group_id: GroupId,
        new_order: &[ParticipantId],
    ) {
        self.rotations.write().unwrap().push((group_id, new_order.to_vec()));
    }

    async fn session_event(
        &self,
        session_id: SessionId,
        event: &MatchEvent,
    ) {
        self.events.write().unwrap().push((session_id, event.clone()));
    }
}

/// Deterministic time source for tests; milliseconds are advanced manually.
pub struct ManualTimeSource {
    now: RwLock<Timestamp>,
}

impl ManualTimeSource {
    #[must_use]
    pub fn starting_at(now: Timestamp) -> Self {
        Self { now: RwLock::new(now) }
    }

    pub fn advance_secs(
        &self,
        seconds: u64,
    ) {
        let mut now = self.now.write().unwrap();
        *now = now.plus(std::time::Duration::from_secs(seconds));
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Timestamp {
        *self.now.read().unwrap()
    }
}

/// Fixed name table; production deployments plug in their member registry.
#[derive(Default)]
pub struct StaticDirectory {
    names: RwLock<HashMap<ParticipantId, String>>,
}

impl StaticDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &self,
        participant_id: ParticipantId,
        name: impl Into<String>,
    ) {
        self.names.write().unwrap().insert(participant_id, name.into());
    }
}

#[async_trait]
impl ParticipantDirectory for StaticDirectory {
    async fn resolve_name(
        &self,
        participant_id: ParticipantId,
    ) -> Option<String> {
        self.names.read().unwrap().get(&participant_id).cloned()
    }
}
