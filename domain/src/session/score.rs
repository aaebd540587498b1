use serde::{Deserialize, Serialize};

use crate::{ParticipantId, Score, Side, Timestamp};

use super::MatchError;

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub struct GoalId(pub uuid::Uuid);

impl GoalId {
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for GoalId {
    fn default() -> Self {
        GoalId::new()
    }
}

/// `side` is always the BENEFICIARY. For an own goal the conceding player is
/// unknown to the ledger; callers pass the side that gains the point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub side: Side,
    pub scorer: Option<ParticipantId>,
    pub own_goal: bool,
    pub recorded_at: Timestamp,
}

/// Append/undo log of scoring events. The running tally is kept alongside the
/// log and must always equal the per-side goal count.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreLedger {
    goals: Vec<Goal>,
    tally: Score,
}

impl ScoreLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        side: Side,
        scorer: Option<ParticipantId>,
        now: Timestamp,
    ) -> Goal {
        let goal = Goal {
            id: GoalId::new(),
            side,
            scorer,
            own_goal: scorer.is_none(),
            recorded_at: now,
        };
        self.goals.push(goal.clone());
        self.tally.increment(side);
        debug_assert_eq!(self.tally, self.derived_score());
        goal
    }

    pub fn undo_last(&mut self) -> Result<Goal, MatchError> {
        let goal = self.goals.pop().ok_or(MatchError::NothingToUndo)?;
        self.tally.decrement(goal.side);
        debug_assert_eq!(self.tally, self.derived_score());
        Ok(goal)
    }

    #[must_use]
    pub fn score(&self) -> Score {
        self.tally
    }

    #[must_use]
    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    fn derived_score(&self) -> Score {
        let mut score = Score::default();
        for goal in &self.goals {
            score.increment(goal.side);
        }
        score
    }
}
