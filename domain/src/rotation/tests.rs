use crate::session::{MatchResult, MatchVerdict};
use crate::{GroupId, ParticipantId, Score, SessionId, Side};

use super::*;

const ROSTER_SIZE: usize = 6;

fn players(count: usize) -> Vec<ParticipantId> {
    (0..count).map(|_| ParticipantId::new()).collect()
}

fn result(
    incumbent_roster: &[ParticipantId],
    challenger_roster: &[ParticipantId],
    verdict: MatchVerdict,
) -> MatchResult {
    // Incumbent fixed on side A, mirroring session defaults.
    MatchResult {
        session_id: SessionId::new(),
        group_id: GroupId::new(),
        score: Score::default(),
        verdict,
        incumbent: Side::A,
        side_a: incumbent_roster.to_vec(),
        side_b: challenger_roster.to_vec(),
        roster_size: ROSTER_SIZE,
    }
}

#[test]
fn streak_extends_below_the_cap() {
    let mut streak = WinStreak::new(3);
    assert_eq!(streak.observe(StreakOutcome::IncumbentWon), StreakSignal::Extended);
    assert_eq!(streak.count(), 1);
    assert_eq!(streak.observe(StreakOutcome::IncumbentWon), StreakSignal::Extended);
    assert_eq!(streak.count(), 2);
}

#[test]
fn streak_at_cap_minus_one_signals_cap_reached_on_a_win() {
    let mut streak = WinStreak::new(3);
    streak.observe(StreakOutcome::IncumbentWon);
    streak.observe(StreakOutcome::IncumbentWon);
    assert_eq!(streak.count(), 2);

    assert_eq!(streak.observe(StreakOutcome::IncumbentWon), StreakSignal::CapReached);
    streak.reset();
    assert_eq!(streak.count(), 0);
}

#[test]
fn challenger_win_banks_one_win_for_the_new_incumbent() {
    let mut streak = WinStreak::new(3);
    streak.observe(StreakOutcome::IncumbentWon);
    streak.observe(StreakOutcome::IncumbentWon);

    assert_eq!(streak.observe(StreakOutcome::ChallengerWon), StreakSignal::NewIncumbent);
    assert_eq!(streak.count(), 1);
}

#[test]
fn tie_signals_priority_needed() {
    let mut streak = WinStreak::new(3);
    streak.observe(StreakOutcome::IncumbentWon);
    assert_eq!(streak.observe(StreakOutcome::Tie), StreakSignal::TieNeedsPriority);
}

#[test]
fn incumbent_win_below_cap_rotates_only_the_challenger() {
    // Worked example: queue [p1..p12], challenger [p1..p6] holds the queue
    // front while playing, incumbent roster is off-queue.
    let queue_players = players(12);
    let incumbent = players(ROSTER_SIZE);
    let challenger = queue_players[..ROSTER_SIZE].to_vec();
    let queue = RotationQueue::from_order(queue_players.clone()).unwrap();

    let mut streak = WinStreak::new(3);
    streak.observe(StreakOutcome::IncumbentWon); // going 1 -> 2 below cap

    let rotation = rotate(
        &result(&incumbent, &challenger, MatchVerdict::Winner(Side::A)),
        streak,
        &queue,
    )
    .unwrap();

    // Losers to the back, nothing else moves: [p7..p12, p1..p6].
    let mut expected = queue_players[ROSTER_SIZE..].to_vec();
    expected.extend_from_slice(&challenger);
    assert_eq!(rotation.new_order, expected);

    assert_eq!(rotation.next_incumbent, incumbent);
    assert_eq!(rotation.next_challenger, queue_players[ROSTER_SIZE..].to_vec());
    assert_eq!(rotation.streak.count(), 2);
}

#[test]
fn challenger_win_sends_the_incumbent_to_the_back() {
    let queue_players = players(12);
    let incumbent = players(ROSTER_SIZE);
    let challenger = queue_players[..ROSTER_SIZE].to_vec();
    let queue = RotationQueue::from_order(queue_players.clone()).unwrap();

    let rotation = rotate(
        &result(&incumbent, &challenger, MatchVerdict::Winner(Side::B)),
        WinStreak::new(3),
        &queue,
    )
    .unwrap();

    let mut expected = queue_players[ROSTER_SIZE..].to_vec();
    expected.extend_from_slice(&incumbent);
    assert_eq!(rotation.new_order, expected);

    // Winner leaves the queue and keeps the pitch with one win banked.
    assert_eq!(rotation.next_incumbent, challenger);
    assert_eq!(rotation.next_challenger, queue_players[ROSTER_SIZE..].to_vec());
    assert_eq!(rotation.streak.count(), 1);
}

#[test]
fn tie_rotates_both_with_the_priority_side_re_entering_sooner() {
    // Worked example: queue [p1..p18], challenger occupies [p1..p6],
    // tie-break priority to the incumbent.
    let queue_players = players(18);
    let incumbent = players(ROSTER_SIZE);
    let challenger = queue_players[..ROSTER_SIZE].to_vec();
    let queue = RotationQueue::from_order(queue_players.clone()).unwrap();

    let mut streak = WinStreak::new(3);
    streak.observe(StreakOutcome::IncumbentWon);

    let rotation = rotate(
        &result(&incumbent, &challenger, MatchVerdict::Tie { priority: Side::A }),
        streak,
        &queue,
    )
    .unwrap();

    // Front-loads [p7..p18], then incumbent roster, then challenger roster.
    let mut expected = queue_players[ROSTER_SIZE..].to_vec();
    expected.extend_from_slice(&incumbent);
    expected.extend_from_slice(&challenger);
    assert_eq!(rotation.new_order, expected);

    assert_eq!(rotation.next_incumbent, queue_players[ROSTER_SIZE..2 * ROSTER_SIZE].to_vec());
    assert_eq!(
        rotation.next_challenger,
        queue_players[2 * ROSTER_SIZE..3 * ROSTER_SIZE].to_vec()
    );
    assert_eq!(rotation.streak.count(), 0);
}

#[test]
fn tie_with_challenger_priority_flips_the_exit_order() {
    let queue_players = players(18);
    let incumbent = players(ROSTER_SIZE);
    let challenger = queue_players[..ROSTER_SIZE].to_vec();
    let queue = RotationQueue::from_order(queue_players.clone()).unwrap();

    let rotation = rotate(
        &result(&incumbent, &challenger, MatchVerdict::Tie { priority: Side::B }),
        WinStreak::new(3),
        &queue,
    )
    .unwrap();

    let mut expected = queue_players[ROSTER_SIZE..].to_vec();
    expected.extend_from_slice(&challenger);
    expected.extend_from_slice(&incumbent);
    assert_eq!(rotation.new_order, expected);
}

#[test]
fn cap_reached_rotates_both_with_the_incumbent_sooner() {
    let queue_players = players(18);
    let incumbent = players(ROSTER_SIZE);
    let challenger = queue_players[..ROSTER_SIZE].to_vec();
    let queue = RotationQueue::from_order(queue_players.clone()).unwrap();

    let mut streak = WinStreak::new(3);
    streak.observe(StreakOutcome::IncumbentWon);
    streak.observe(StreakOutcome::IncumbentWon);

    let rotation = rotate(
        &result(&incumbent, &challenger, MatchVerdict::Winner(Side::A)),
        streak,
        &queue,
    )
    .unwrap();

    let mut expected = queue_players[ROSTER_SIZE..].to_vec();
    expected.extend_from_slice(&incumbent);
    expected.extend_from_slice(&challenger);
    assert_eq!(rotation.new_order, expected);
    assert_eq!(rotation.streak.count(), 0);
}

#[test]
fn rotation_fails_loudly_when_the_queue_cannot_field_a_side() {
    // Only 3 players left waiting behind the losing challenger.
    let queue_players = players(9);
    let incumbent = players(ROSTER_SIZE);
    let challenger = queue_players[..ROSTER_SIZE].to_vec();
    let queue = RotationQueue::from_order(queue_players.clone()).unwrap();

    let err = rotate(
        &result(&incumbent, &challenger, MatchVerdict::Winner(Side::A)),
        WinStreak::new(3),
        &queue,
    )
    .unwrap_err();

    assert_eq!(
        err,
        RotationError::InsufficientQueue {
            available: 3,
            required: ROSTER_SIZE,
        }
    );
    // The snapshot is untouched; rotation is retryable once more players join.
    assert_eq!(queue.order(), queue_players);
}

#[test]
fn both_exit_cases_need_two_full_sides_waiting() {
    let queue_players = players(14);
    let incumbent = players(ROSTER_SIZE);
    let challenger = queue_players[..ROSTER_SIZE].to_vec();
    let queue = RotationQueue::from_order(queue_players).unwrap();

    let err = rotate(
        &result(&incumbent, &challenger, MatchVerdict::Tie { priority: Side::A }),
        WinStreak::new(3),
        &queue,
    )
    .unwrap_err();

    assert_eq!(
        err,
        RotationError::InsufficientQueue {
            available: 8,
            required: 2 * ROSTER_SIZE,
        }
    );
}

#[test]
fn queue_join_and_leave_commands() {
    let mut queue = RotationQueue::new();
    let player = ParticipantId::new();

    assert_eq!(queue.handle_command(QueueCommand::Join(player)), QueueOutcome::Joined(player));
    assert_eq!(queue.handle_command(QueueCommand::Join(player)), QueueOutcome::AlreadyQueued);
    assert_eq!(queue.position(player), Some(1));

    assert_eq!(queue.handle_command(QueueCommand::Leave(player)), QueueOutcome::Left(player));
    assert_eq!(queue.handle_command(QueueCommand::Leave(player)), QueueOutcome::NotQueued);
    assert!(queue.is_empty());
}

#[test]
fn queue_rejects_duplicate_entries() {
    let player = ParticipantId::new();
    let err = RotationQueue::from_order(vec![player, ParticipantId::new(), player]).unwrap_err();
    assert_eq!(err, RotationError::DuplicateEntry(player));
}
