mod types;

pub mod rotation;
pub mod session;

pub use rotation::{
    QueueCommand, QueueOutcome, Rotation, RotationError, RotationQueue, StreakOutcome, StreakSignal, WinStreak, rotate,
};
pub use session::{
    ClockState, ClockStatus, Goal, GoalId, MatchAction, MatchConfig, MatchEffect, MatchError, MatchEvent, MatchResult,
    MatchSession, MatchVerdict, PauseCause, RosterLedger, ScoreLedger, Substitution,
};
pub use types::{GroupId, ParticipantId, Score, SessionId, Side, Timestamp};
