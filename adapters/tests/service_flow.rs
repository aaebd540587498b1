use std::sync::Arc;
use std::time::Duration;

use adapters::{InMemoryStore, ManualTimeSource, RecordingNotifier};
use application::ServiceError;
use application::ports::in_::{QueueService, RotationService, ServiceConfig, SessionService};
use application::ports::out_::{MatchNotifier, SessionStore, StorageError, StreakStore, TimeSource};
use domain::{
    GroupId, MatchAction, MatchConfig, MatchError, ParticipantId, QueueOutcome, RotationError, Side, Timestamp,
};

fn players(count: usize) -> Vec<ParticipantId> {
    (0..count).map(|_| ParticipantId::new()).collect()
}

fn match_config() -> MatchConfig {
    MatchConfig {
        duration: Duration::from_secs(60),
        roster_size: 2,
        sync_interval: Duration::from_secs(1),
        checkpoint_interval: Duration::from_secs(10),
        resume_hold: Duration::from_secs(3),
        incumbent: Side::A,
    }
}

struct Fixture {
    store: Arc<InMemoryStore>,
    time: Arc<ManualTimeSource>,
    notifier: Arc<RecordingNotifier>,
    sessions: SessionService,
    rotations: RotationService,
    queue: QueueService,
    group_id: GroupId,
}

fn fixture() -> Fixture {
    let store = Arc::new(InMemoryStore::new());
    let time = Arc::new(ManualTimeSource::starting_at(Timestamp::from_millis(1_700_000_000_000)));
    let notifier = Arc::new(RecordingNotifier::new());
    let sessions = SessionService::new(
        Arc::clone(&store) as Arc<dyn SessionStore>,
        Arc::clone(&notifier) as Arc<dyn MatchNotifier>,
        Arc::clone(&time) as Arc<dyn TimeSource>,
        ServiceConfig::default(),
    );
    let rotations = RotationService::new(
        Arc::clone(&store) as _,
        Arc::clone(&store) as _,
        Arc::clone(&notifier) as _,
        ServiceConfig::default(),
    );
    let queue = QueueService::new(Arc::clone(&store) as _, ServiceConfig::default());
    Fixture {
        store,
        time,
        notifier,
        sessions,
        rotations,
        queue,
        group_id: GroupId::new(),
    }
}

/// A second device sharing the same store, cold-loading from checkpoints.
fn second_device(f: &Fixture) -> SessionService {
    SessionService::new(
        Arc::clone(&f.store) as _,
        Arc::clone(&f.notifier) as _,
        Arc::clone(&f.time) as _,
        ServiceConfig::default(),
    )
}

#[tokio::test]
async fn goals_notify_and_persist_through_the_checkpoint() {
    let f = fixture();
    let (side_a, side_b) = (players(2), players(2));
    let scorer = side_a[0];

    let id = f
        .sessions
        .create_session(f.group_id, side_a, side_b, match_config())
        .await
        .unwrap();
    f.sessions.start(id).await.unwrap();
    f.sessions.record_goal(id, Side::A, Some(scorer)).await.unwrap();

    let (_, score) = *f.notifier.scores().last().unwrap();
    assert_eq!((score.side_a, score.side_b), (1, 0));

    let stored = f.store.stored_session(id).unwrap();
    assert_eq!(stored.value.score().side_a, 1);
}

#[tokio::test]
async fn a_running_clock_recovers_from_a_crash() {
    let f = fixture();
    let id = f
        .sessions
        .create_session(f.group_id, players(2), players(2), match_config())
        .await
        .unwrap();
    f.sessions.start(id).await.unwrap();

    // Start persisted a running checkpoint; one tick later the process dies.
    f.time.advance_secs(1);
    f.sessions.apply(id, MatchAction::ClockSync).await.unwrap();

    let restarted = second_device(&f);
    f.time.advance_secs(30);

    // Status was Running, so the stored start is trusted verbatim and the
    // full 31 seconds count as played.
    let snapshot = restarted.snapshot(id).await.unwrap();
    assert_eq!(snapshot.clock().remaining(f.time.now()), 29);
}

#[tokio::test]
async fn a_paused_session_resumes_exactly_after_a_long_reload() {
    let f = fixture();
    let id = f
        .sessions
        .create_session(f.group_id, players(2), players(2), match_config())
        .await
        .unwrap();
    f.sessions.start(id).await.unwrap();

    f.time.advance_secs(20);
    f.sessions.pause(id).await.unwrap();

    let restarted = second_device(&f);
    f.time.advance_secs(86_400);
    restarted.resume(id).await.unwrap();

    let snapshot = restarted.snapshot(id).await.unwrap();
    assert_eq!(snapshot.clock().remaining(f.time.now()), 40);
}

#[tokio::test]
async fn finalize_rotates_the_queue_and_banks_the_streak() {
    let f = fixture();
    let (side_a, side_b) = (players(2), players(2));
    let waiting = players(4);

    // Challenger holds the queue front while playing; four players wait.
    let mut order = side_b.clone();
    order.extend_from_slice(&waiting);
    f.store.seed_queue(f.group_id, order);

    let id = f
        .sessions
        .create_session(f.group_id, side_a.clone(), side_b.clone(), match_config())
        .await
        .unwrap();
    f.sessions.start(id).await.unwrap();
    f.sessions.record_goal(id, Side::A, Some(side_a[0])).await.unwrap();

    let result = f.sessions.finalize(id, None).await.unwrap();
    assert_eq!(result.winner(), Some(Side::A));

    let rotation = f.rotations.apply(&result).await.unwrap();

    // Incumbent win below the cap: only the challenger exits to the back.
    let mut expected = waiting.clone();
    expected.extend_from_slice(&side_b);
    assert_eq!(rotation.new_order, expected);
    assert_eq!(rotation.next_incumbent, side_a);
    assert_eq!(rotation.next_challenger, waiting[..2].to_vec());

    assert_eq!(f.store.stored_queue(f.group_id).unwrap().value, expected);
    assert_eq!(f.store.load_streak(f.group_id).await.unwrap().count(), 1);

    let (group, order) = f.notifier.rotations().last().unwrap().clone();
    assert_eq!(group, f.group_id);
    assert_eq!(order, expected);
}

#[tokio::test]
async fn rotation_with_a_short_queue_fails_and_is_retryable() {
    let f = fixture();
    let (side_a, side_b) = (players(2), players(2));

    // Only one player waiting behind the losing challenger.
    let straggler = ParticipantId::new();
    let mut order = side_b.clone();
    order.push(straggler);
    f.store.seed_queue(f.group_id, order.clone());

    let id = f
        .sessions
        .create_session(f.group_id, side_a, side_b, match_config())
        .await
        .unwrap();
    f.sessions.start(id).await.unwrap();
    f.sessions.record_goal(id, Side::A, None).await.unwrap();
    let result = f.sessions.finalize(id, None).await.unwrap();

    let err = f.rotations.apply(&result).await.unwrap_err();
    assert_eq!(
        err,
        ServiceError::Rotation(RotationError::InsufficientQueue {
            available: 1,
            required: 2,
        })
    );
    // Queue untouched, match record intact.
    assert_eq!(f.store.stored_queue(f.group_id).unwrap().value, order);

    // Once the queue collaborator reports another player, the same result
    // rotates cleanly.
    f.queue.join(f.group_id, ParticipantId::new()).await.unwrap();
    f.rotations.apply(&result).await.unwrap();
}

#[tokio::test]
async fn checkpoint_outage_degrades_to_local_state() {
    let f = fixture();
    let id = f
        .sessions
        .create_session(f.group_id, players(2), players(2), match_config())
        .await
        .unwrap();
    f.sessions.start(id).await.unwrap();

    f.time.advance_secs(1);
    f.sessions.apply(id, MatchAction::ClockSync).await.unwrap();
    let persisted_before = f.store.stored_session(id).unwrap();

    f.store.set_unavailable(true);
    // Play continues: the mutation succeeds against in-memory state.
    f.sessions.record_goal(id, Side::B, None).await.unwrap();
    assert_eq!(f.notifier.scores().last().unwrap().1.side_b, 1);
    f.store.set_unavailable(false);
    assert_eq!(f.store.stored_session(id).unwrap(), persisted_before);

    // The next due checkpoint retries the write and catches up.
    f.time.advance_secs(10);
    f.sessions.apply(id, MatchAction::ClockSync).await.unwrap();
    assert_eq!(f.store.stored_session(id).unwrap().value.score().side_b, 1);
}

#[tokio::test]
async fn finalize_is_rejected_while_storage_is_down() {
    let f = fixture();
    let id = f
        .sessions
        .create_session(f.group_id, players(2), players(2), match_config())
        .await
        .unwrap();
    f.sessions.start(id).await.unwrap();
    f.sessions.record_goal(id, Side::A, None).await.unwrap();

    f.store.set_unavailable(true);
    let err = f.sessions.finalize(id, None).await.unwrap_err();
    assert!(matches!(err, ServiceError::Storage(StorageError::Unavailable(_))));

    // Not accepted as applied: the session is still open and finalizes fine
    // once storage returns.
    f.store.set_unavailable(false);
    assert!(!f.sessions.snapshot(id).await.unwrap().is_finished());
    f.sessions.finalize(id, None).await.unwrap();
}

#[tokio::test]
async fn concurrent_devices_resolve_through_stale_write() {
    let f = fixture();
    let id = f
        .sessions
        .create_session(f.group_id, players(2), players(2), match_config())
        .await
        .unwrap();
    f.sessions.start(id).await.unwrap();

    // A second tab loads the same session and scores first.
    let other_tab = second_device(&f);
    other_tab.record_goal(id, Side::A, None).await.unwrap();

    // The first tab's write is based on a version the store no longer holds.
    let err = f.sessions.record_goal(id, Side::B, None).await.unwrap_err();
    assert!(err.is_stale_write());

    // The failed writer adopted the fresh state; the retry lands on top.
    f.sessions.record_goal(id, Side::B, None).await.unwrap();
    let snapshot = f.sessions.snapshot(id).await.unwrap();
    assert_eq!((snapshot.score().side_a, snapshot.score().side_b), (1, 1));
}

#[tokio::test]
async fn tie_finalize_requires_a_priority_side() {
    let f = fixture();
    let id = f
        .sessions
        .create_session(f.group_id, players(2), players(2), match_config())
        .await
        .unwrap();
    f.sessions.start(id).await.unwrap();

    let err = f.sessions.finalize(id, None).await.unwrap_err();
    assert_eq!(err, ServiceError::Match(MatchError::TieBreakRequired));

    f.sessions.finalize(id, Some(Side::B)).await.unwrap();
}

#[tokio::test]
async fn manual_queue_edits_share_the_version_token() {
    let f = fixture();
    let regular = ParticipantId::new();

    assert_eq!(f.queue.join(f.group_id, regular).await.unwrap(), QueueOutcome::Joined(regular));
    assert_eq!(f.queue.join(f.group_id, regular).await.unwrap(), QueueOutcome::AlreadyQueued);

    let stored = f.store.stored_queue(f.group_id).unwrap();
    assert_eq!(stored.value, vec![regular]);

    assert_eq!(f.queue.leave(f.group_id, regular).await.unwrap(), QueueOutcome::Left(regular));
    assert_eq!(
        f.queue.leave(f.group_id, regular).await.unwrap(),
        QueueOutcome::NotQueued
    );
    // Only real edits bump the version.
    assert!(f.store.stored_queue(f.group_id).unwrap().version.0 > stored.version.0);
}
