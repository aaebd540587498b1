use thiserror::Error;

use crate::{ParticipantId, Side};

use super::clock::ClockStatus;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    #[error("{op} not valid while clock is {status:?}")]
    InvalidTransition { op: &'static str, status: ClockStatus },

    #[error("session is finalized and immutable")]
    SessionClosed,

    #[error("invalid substitution: {player:?} on side {side}")]
    InvalidSubstitution { player: ParticipantId, side: Side },

    #[error("player {0:?} fielded on both sides")]
    InvalidRoster(ParticipantId),

    #[error("side {side} fields {actual} players, {expected} required")]
    RosterSizeMismatch { side: Side, expected: usize, actual: usize },

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("scores are level; finalize requires a tie-break side")]
    TieBreakRequired,
}
