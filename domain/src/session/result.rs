use serde::{Deserialize, Serialize};

use crate::{GroupId, ParticipantId, Score, SessionId, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchVerdict {
    Winner(Side),
    /// Level score resolved by an explicit operator selection of which side
    /// re-enters the waiting line sooner.
    Tie { priority: Side },
}

/// Immutable record handed to the rotation engine once a session finalizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub session_id: SessionId,
    pub group_id: GroupId,
    pub score: Score,
    pub verdict: MatchVerdict,
    pub incumbent: Side,
    pub side_a: Vec<ParticipantId>,
    pub side_b: Vec<ParticipantId>,
    pub roster_size: usize,
}

impl MatchResult {
    #[must_use]
    pub fn roster(
        &self,
        side: Side,
    ) -> &[ParticipantId] {
        match side {
            Side::A => &self.side_a,
            Side::B => &self.side_b,
        }
    }

    #[must_use]
    pub fn incumbent_roster(&self) -> &[ParticipantId] {
        self.roster(self.incumbent)
    }

    #[must_use]
    pub fn challenger_roster(&self) -> &[ParticipantId] {
        self.roster(self.incumbent.opposite())
    }

    #[must_use]
    pub fn winner(&self) -> Option<Side> {
        match self.verdict {
            MatchVerdict::Winner(side) => Some(side),
            MatchVerdict::Tie { .. } => None,
        }
    }
}
