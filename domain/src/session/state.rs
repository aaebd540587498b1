use serde::{Deserialize, Serialize};

use crate::{GroupId, ParticipantId, Score, SessionId, Side, Timestamp};

use super::clock::{ClockState, ClockStatus};
use super::result::{MatchResult, MatchVerdict};
use super::roster::RosterLedger;
use super::score::ScoreLedger;
use super::{MatchAction, MatchConfig, MatchEffect, MatchError, MatchEvent};

/// Why the clock is currently paused. System-initiated causes auto-resume
/// when the triggering flow completes; a manual pause waits for an explicit
/// resume; an expiry freeze only ends at finalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PauseCause {
    Manual,
    Substitution,
    Expired,
}

/// One timed contest between two fixed-size rosters, orchestrating the clock,
/// the goal ledger and the roster ledger through
/// `idle -> running <-> paused -> finished`.
///
/// The whole struct is the checkpoint unit: serializing it mid-match and
/// deserializing after a restart restores a correct session. A snapshot taken
/// while `Running` keeps its stored start verbatim; any other status carries
/// only the frozen elapsed value and re-derives a start on the next resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSession {
    id: SessionId,
    group_id: GroupId,
    config: MatchConfig,
    clock: ClockState,
    goals: ScoreLedger,
    rosters: RosterLedger,
    pause_cause: Option<PauseCause>,
    open_windows: Vec<Side>,
    last_checkpoint_at: Option<Timestamp>,
    verdict: Option<MatchVerdict>,
}

impl MatchSession {
    pub fn new(
        group_id: GroupId,
        side_a: Vec<ParticipantId>,
        side_b: Vec<ParticipantId>,
        config: MatchConfig,
    ) -> Result<Self, MatchError> {
        // Fixed-size sides: the rotation engine slices the next line-up by
        // roster_size, so both rosters must match it exactly.
        for (side, roster) in [(Side::A, &side_a), (Side::B, &side_b)] {
            if roster.len() != config.roster_size {
                return Err(MatchError::RosterSizeMismatch {
                    side,
                    expected: config.roster_size,
                    actual: roster.len(),
                });
            }
        }
        let rosters = RosterLedger::new(side_a, side_b)?;
        let clock = ClockState::new(config.duration, config.resume_hold);
        Ok(Self {
            id: SessionId::new(),
            group_id,
            config,
            clock,
            goals: ScoreLedger::new(),
            rosters,
            pause_cause: None,
            open_windows: Vec::new(),
            last_checkpoint_at: None,
            verdict: None,
        })
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub fn clock(&self) -> &ClockState {
        &self.clock
    }

    #[must_use]
    pub fn score(&self) -> Score {
        self.goals.score()
    }

    #[must_use]
    pub fn goals(&self) -> &super::ScoreLedger {
        &self.goals
    }

    #[must_use]
    pub fn rosters(&self) -> &RosterLedger {
        &self.rosters
    }

    #[must_use]
    pub fn pause_cause(&self) -> Option<PauseCause> {
        self.pause_cause
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.verdict.is_some()
    }

    /// The immutable record produced by finalize, `None` before then.
    #[must_use]
    pub fn result(&self) -> Option<MatchResult> {
        self.verdict.map(|verdict| MatchResult {
            session_id: self.id,
            group_id: self.group_id,
            score: self.goals.score(),
            verdict,
            incumbent: self.config.incumbent,
            side_a: self.rosters.side(Side::A).to_vec(),
            side_b: self.rosters.side(Side::B).to_vec(),
            roster_size: self.config.roster_size,
        })
    }

    pub fn process_action(
        &mut self,
        action: MatchAction,
        now: Timestamp,
    ) -> Result<Vec<MatchEffect>, MatchError> {
        if self.is_finished() {
            // The sync loop may still fire once after finalize; let it drain.
            return match action {
                MatchAction::ClockSync => Ok(Vec::new()),
                _ => Err(MatchError::SessionClosed),
            };
        }
        match action {
            MatchAction::Start => self.handle_start(now),
            MatchAction::Pause => self.handle_pause(now),
            MatchAction::Resume => self.handle_resume(now),
            MatchAction::RecordGoal { side, scorer } => self.handle_record_goal(side, scorer, now),
            MatchAction::UndoGoal => self.handle_undo_goal(),
            MatchAction::BeginSubstitution { side } => self.handle_begin_substitution(side, now),
            MatchAction::CompleteSubstitution {
                side,
                player_out,
                player_in,
            } => self.handle_complete_substitution(side, player_out, player_in, now),
            MatchAction::UndoSubstitution => self.handle_undo_substitution(),
            MatchAction::ClockSync => self.handle_clock_sync(now),
            MatchAction::Finalize { tie_break } => self.handle_finalize(tie_break, now),
        }
    }

    fn handle_start(
        &mut self,
        now: Timestamp,
    ) -> Result<Vec<MatchEffect>, MatchError> {
        self.clock.start(now)?;
        Ok(vec![
            MatchEffect::Notify(MatchEvent::ClockStarted {
                remaining_secs: self.clock.remaining(now),
            }),
            MatchEffect::ScheduleSync {
                delay: self.config.sync_interval,
            },
        ])
    }

    fn handle_pause(
        &mut self,
        now: Timestamp,
    ) -> Result<Vec<MatchEffect>, MatchError> {
        self.clock.pause(now)?;
        self.pause_cause = Some(PauseCause::Manual);
        Ok(vec![MatchEffect::Notify(MatchEvent::ClockPaused {
            remaining_secs: self.clock.remaining(now),
            cause: PauseCause::Manual,
        })])
    }

    fn handle_resume(
        &mut self,
        now: Timestamp,
    ) -> Result<Vec<MatchEffect>, MatchError> {
        if !self.open_windows.is_empty() || self.pause_cause == Some(PauseCause::Expired) {
            return Err(MatchError::InvalidTransition {
                op: "resume",
                status: self.clock.status(),
            });
        }
        self.clock.resume(now)?;
        self.pause_cause = None;
        Ok(vec![MatchEffect::Notify(MatchEvent::ClockResumed {
            remaining_secs: self.clock.remaining(now),
        })])
    }

    fn handle_record_goal(
        &mut self,
        side: Side,
        scorer: Option<ParticipantId>,
        now: Timestamp,
    ) -> Result<Vec<MatchEffect>, MatchError> {
        if self.clock.status() != ClockStatus::Running {
            return Err(MatchError::InvalidTransition {
                op: "record_goal",
                status: self.clock.status(),
            });
        }
        self.goals.record(side, scorer, now);
        Ok(vec![MatchEffect::Notify(MatchEvent::ScoreChanged {
            score: self.goals.score(),
            side,
            scorer,
        })])
    }

    fn handle_undo_goal(&mut self) -> Result<Vec<MatchEffect>, MatchError> {
        self.goals.undo_last()?;
        Ok(vec![MatchEffect::Notify(MatchEvent::GoalRevoked {
            score: self.goals.score(),
        })])
    }

    fn handle_begin_substitution(
        &mut self,
        side: Side,
        now: Timestamp,
    ) -> Result<Vec<MatchEffect>, MatchError> {
        if self.open_windows.contains(&side) {
            return Err(MatchError::InvalidTransition {
                op: "begin_substitution",
                status: self.clock.status(),
            });
        }
        if self.clock.status() == ClockStatus::Running {
            self.clock.pause(now)?;
            self.pause_cause = Some(PauseCause::Substitution);
        }
        self.open_windows.push(side);
        Ok(vec![MatchEffect::Notify(MatchEvent::SubstitutionWindowOpened { side })])
    }

    fn handle_complete_substitution(
        &mut self,
        side: Side,
        player_out: ParticipantId,
        player_in: ParticipantId,
        now: Timestamp,
    ) -> Result<Vec<MatchEffect>, MatchError> {
        if !self.open_windows.contains(&side) {
            return Err(MatchError::InvalidTransition {
                op: "complete_substitution",
                status: self.clock.status(),
            });
        }
        let swap = self
            .rosters
            .complete_swap(player_out, player_in, side, self.clock.elapsed_snapshot())?;
        self.open_windows.retain(|&open| open != side);

        let mut effects = vec![MatchEffect::Notify(MatchEvent::SubstitutionMade {
            side: swap.side,
            player_out: swap.player_out,
            player_in: swap.player_in,
        })];

        // Auto-resume only a system-initiated pause, and only once every
        // window is closed. A manual pause stays paused.
        if self.open_windows.is_empty() && self.pause_cause == Some(PauseCause::Substitution) {
            self.clock.resume(now)?;
            self.pause_cause = None;
            effects.push(MatchEffect::Notify(MatchEvent::ClockResumed {
                remaining_secs: self.clock.remaining(now),
            }));
        }
        Ok(effects)
    }

    fn handle_undo_substitution(&mut self) -> Result<Vec<MatchEffect>, MatchError> {
        let swap = self.rosters.undo_last_swap()?;
        Ok(vec![MatchEffect::Notify(MatchEvent::SubstitutionRevoked {
            side: swap.side,
            player_out: swap.player_out,
            player_in: swap.player_in,
        })])
    }

    fn handle_clock_sync(
        &mut self,
        now: Timestamp,
    ) -> Result<Vec<MatchEffect>, MatchError> {
        match self.clock.status() {
            ClockStatus::Running => {
                if self.clock.expired(now) {
                    // Freeze, do not finalize: an operator must still confirm
                    // the result, allowing last-second correction.
                    self.clock.pause(now)?;
                    self.pause_cause = Some(PauseCause::Expired);
                    return Ok(vec![
                        MatchEffect::Notify(MatchEvent::ClockTick { remaining_secs: 0 }),
                        MatchEffect::Notify(MatchEvent::TimeExpired),
                        MatchEffect::Checkpoint,
                    ]);
                }
                let mut effects = vec![MatchEffect::Notify(MatchEvent::ClockTick {
                    remaining_secs: self.clock.remaining(now),
                })];
                if self.checkpoint_wanted(now) {
                    self.last_checkpoint_at = Some(now);
                    effects.push(MatchEffect::Checkpoint);
                }
                effects.push(MatchEffect::ScheduleSync {
                    delay: self.config.sync_interval,
                });
                Ok(effects)
            }
            // Keep the loop alive so play resumes ticking without rearming.
            ClockStatus::Paused | ClockStatus::Idle => Ok(vec![MatchEffect::ScheduleSync {
                delay: self.config.sync_interval,
            }]),
            ClockStatus::Finished => Ok(Vec::new()),
        }
    }

    fn handle_finalize(
        &mut self,
        tie_break: Option<Side>,
        now: Timestamp,
    ) -> Result<Vec<MatchEffect>, MatchError> {
        let score = self.goals.score();
        let verdict = match score.leader() {
            Some(winner) => MatchVerdict::Winner(winner),
            None => {
                let priority = tie_break.ok_or(MatchError::TieBreakRequired)?;
                MatchVerdict::Tie { priority }
            }
        };
        self.clock.finish(now)?;
        self.pause_cause = None;
        self.open_windows.clear();
        self.verdict = Some(verdict);

        let result = MatchResult {
            session_id: self.id,
            group_id: self.group_id,
            score,
            verdict,
            incumbent: self.config.incumbent,
            side_a: self.rosters.side(Side::A).to_vec(),
            side_b: self.rosters.side(Side::B).to_vec(),
            roster_size: self.config.roster_size,
        };
        Ok(vec![
            MatchEffect::Notify(MatchEvent::SessionFinalized(result)),
            MatchEffect::Checkpoint,
        ])
    }

    fn checkpoint_wanted(
        &self,
        now: Timestamp,
    ) -> bool {
        if !self.clock.checkpoint_due(now) {
            return false;
        }
        match self.last_checkpoint_at {
            Some(last) => now >= last.plus(self.config.checkpoint_interval),
            None => true,
        }
    }
}
