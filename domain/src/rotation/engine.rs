use thiserror::Error;

use crate::session::{MatchResult, MatchVerdict};
use crate::ParticipantId;

use super::queue::RotationQueue;
use super::streak::{StreakOutcome, StreakSignal, WinStreak};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RotationError {
    #[error("{available} players waiting, {required} required to field the next side")]
    InsufficientQueue { available: usize, required: usize },

    #[error("duplicate queue entry {0:?}")]
    DuplicateEntry(ParticipantId),
}

/// Complete replacement ordering plus the next pitch assignment, computed
/// once per finished match.
#[derive(Debug, Clone, PartialEq)]
pub struct Rotation {
    pub new_order: Vec<ParticipantId>,
    pub streak: WinStreak,
    pub next_incumbent: Vec<ParticipantId>,
    pub next_challenger: Vec<ParticipantId>,
}

/// Pure function of (result, streak, queue snapshot) — no wall clock, no
/// randomness — so every rotation is replayable.
///
/// Players already on the pitch may still occupy queue positions (a side
/// drawn from the front keeps its slots until it rotates out); the policy
/// works on `waiting`, the snapshot minus both rosters. Priority order:
///
/// 1. Tie: both rosters exit; the tie-break side re-enters immediately
///    before the other.
/// 2. Challenger win: the incumbent roster exits to the immediate back; the
///    winner leaves the queue and keeps the pitch with streak 1.
/// 3. Incumbent win below cap: only the challenger roster exits; the
///    incumbent is not re-enqueued.
/// 4. Incumbent win at cap: both exit, incumbent immediately before
///    challenger, streak reset.
pub fn rotate(
    result: &MatchResult,
    mut streak: WinStreak,
    queue: &RotationQueue,
) -> Result<Rotation, RotationError> {
    let roster_size = result.roster_size;
    let incumbent_roster = result.incumbent_roster().to_vec();
    let challenger_roster = result.challenger_roster().to_vec();

    let on_pitch = |player: &ParticipantId| {
        incumbent_roster.contains(player) || challenger_roster.contains(player)
    };
    let waiting: Vec<ParticipantId> = queue.order().iter().copied().filter(|p| !on_pitch(p)).collect();

    let outcome = match result.verdict {
        MatchVerdict::Winner(side) if side == result.incumbent => StreakOutcome::IncumbentWon,
        MatchVerdict::Winner(_) => StreakOutcome::ChallengerWon,
        MatchVerdict::Tie { .. } => StreakOutcome::Tie,
    };
    let signal = streak.observe(outcome);

    let require_waiting = |required: usize| {
        if waiting.len() < required {
            return Err(RotationError::InsufficientQueue {
                available: waiting.len(),
                required,
            });
        }
        Ok(())
    };

    match signal {
        StreakSignal::TieNeedsPriority => {
            require_waiting(2 * roster_size)?;
            streak.reset();
            let priority = match result.verdict {
                MatchVerdict::Tie { priority } => priority,
                // observe() only signals a tie for a tie verdict
                MatchVerdict::Winner(side) => side,
            };
            let (sooner, later) = if priority == result.incumbent {
                (incumbent_roster, challenger_roster)
            } else {
                (challenger_roster, incumbent_roster)
            };
            let new_order = both_exit(waiting, &sooner, &later);
            Ok(Rotation {
                next_incumbent: new_order[..roster_size].to_vec(),
                next_challenger: new_order[roster_size..2 * roster_size].to_vec(),
                new_order,
                streak,
            })
        }
        StreakSignal::CapReached => {
            require_waiting(2 * roster_size)?;
            streak.reset();
            // Dominance earns the incumbent rotation priority on the way out.
            let new_order = both_exit(waiting, &incumbent_roster, &challenger_roster);
            Ok(Rotation {
                next_incumbent: new_order[..roster_size].to_vec(),
                next_challenger: new_order[roster_size..2 * roster_size].to_vec(),
                new_order,
                streak,
            })
        }
        StreakSignal::NewIncumbent => {
            require_waiting(roster_size)?;
            let mut new_order = waiting;
            new_order.extend_from_slice(&incumbent_roster);
            Ok(Rotation {
                next_incumbent: challenger_roster,
                next_challenger: new_order[..roster_size].to_vec(),
                new_order,
                streak,
            })
        }
        StreakSignal::Extended => {
            require_waiting(roster_size)?;
            let mut new_order = waiting;
            new_order.extend_from_slice(&challenger_roster);
            Ok(Rotation {
                next_incumbent: incumbent_roster,
                next_challenger: new_order[..roster_size].to_vec(),
                new_order,
                streak,
            })
        }
    }
}

fn both_exit(
    waiting: Vec<ParticipantId>,
    sooner: &[ParticipantId],
    later: &[ParticipantId],
) -> Vec<ParticipantId> {
    let mut new_order = waiting;
    new_order.extend_from_slice(sooner);
    new_order.extend_from_slice(later);
    new_order
}
