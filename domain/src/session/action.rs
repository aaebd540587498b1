use serde::{Deserialize, Serialize};

use crate::{ParticipantId, Side};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum MatchAction {
    Start,
    Pause,
    Resume,
    /// `side` is the beneficiary; `scorer: None` records an own goal.
    RecordGoal {
        side: Side,
        scorer: Option<ParticipantId>,
    },
    UndoGoal,
    BeginSubstitution {
        side: Side,
    },
    CompleteSubstitution {
        side: Side,
        player_out: ParticipantId,
        player_in: ParticipantId,
    },
    UndoSubstitution,
    /// Periodic tick driven by the hosting runtime, never by the domain.
    ClockSync,
    Finalize {
        tie_break: Option<Side>,
    },
}
