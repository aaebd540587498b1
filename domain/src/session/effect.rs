use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ParticipantId, Score, Side};

use super::result::MatchResult;
use super::state::PauseCause;

/// Side effects requested by the state machine; the application layer decides
/// how each is carried out (notification fan-out, durable write, reschedule).
#[derive(Clone, Debug, PartialEq)]
pub enum MatchEffect {
    Notify(MatchEvent),
    /// Persist a durable snapshot of the session now.
    Checkpoint,
    /// Re-arm the periodic ClockSync tick.
    ScheduleSync { delay: Duration },
}

/// Observable state changes, consumed by the presentation collaborator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MatchEvent {
    ClockStarted {
        remaining_secs: u64,
    },
    ClockTick {
        remaining_secs: u64,
    },
    ClockPaused {
        remaining_secs: u64,
        cause: PauseCause,
    },
    ClockResumed {
        remaining_secs: u64,
    },
    ScoreChanged {
        score: Score,
        side: Side,
        scorer: Option<ParticipantId>,
    },
    GoalRevoked {
        score: Score,
    },
    SubstitutionWindowOpened {
        side: Side,
    },
    SubstitutionMade {
        side: Side,
        player_out: ParticipantId,
        player_in: ParticipantId,
    },
    SubstitutionRevoked {
        side: Side,
        player_out: ParticipantId,
        player_in: ParticipantId,
    },
    TimeExpired,
    SessionFinalized(MatchResult),
}
