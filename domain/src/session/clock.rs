use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Timestamp;

use super::MatchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockStatus {
    Idle,
    Running,
    Paused,
    Finished,
}

/// Pure clock arithmetic for one match.
///
/// Elapsed time is always derived from `started_at` against a caller-supplied
/// `now` while running; while paused it is a frozen snapshot. `resume`
/// reconstructs a synthetic start (`now - elapsed`) instead of trusting any
/// previously stored instant, which is what makes remaining time survive an
/// arbitrary-length interruption: only `elapsed_secs` and `status` need to be
/// restored faithfully.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockState {
    status: ClockStatus,
    started_at: Option<Timestamp>,
    elapsed_secs: u64,
    duration_secs: u64,
    /// Checkpoint writes are suppressed until this instant after a resume, so
    /// a stale elapsed value in flight can never overwrite the corrected one.
    checkpoint_hold_until: Option<Timestamp>,
    resume_hold_ms: u64,
}

impl ClockState {
    #[must_use]
    pub fn new(
        duration: Duration,
        resume_hold: Duration,
    ) -> Self {
        Self {
            status: ClockStatus::Idle,
            started_at: None,
            elapsed_secs: 0,
            duration_secs: duration.as_secs(),
            checkpoint_hold_until: None,
            resume_hold_ms: resume_hold.as_millis() as u64,
        }
    }

    #[must_use]
    pub fn status(&self) -> ClockStatus {
        self.status
    }

    #[must_use]
    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    /// Accumulated seconds as of the last pause. Meaningless while running;
    /// use `elapsed` with a `now` instead.
    #[must_use]
    pub fn elapsed_snapshot(&self) -> u64 {
        self.elapsed_secs
    }

    #[must_use]
    pub fn elapsed(
        &self,
        now: Timestamp,
    ) -> u64 {
        match (self.status, self.started_at) {
            (ClockStatus::Running, Some(started_at)) => now.seconds_since(started_at),
            _ => self.elapsed_secs,
        }
    }

    #[must_use]
    pub fn remaining(
        &self,
        now: Timestamp,
    ) -> u64 {
        self.duration_secs.saturating_sub(self.elapsed(now))
    }

    #[must_use]
    pub fn expired(
        &self,
        now: Timestamp,
    ) -> bool {
        self.status != ClockStatus::Idle && self.remaining(now) == 0
    }

    pub fn start(
        &mut self,
        now: Timestamp,
    ) -> Result<(), MatchError> {
        self.require(ClockStatus::Idle, "start")?;
        self.status = ClockStatus::Running;
        self.started_at = Some(now);
        self.elapsed_secs = 0;
        Ok(())
    }

    pub fn pause(
        &mut self,
        now: Timestamp,
    ) -> Result<(), MatchError> {
        self.require(ClockStatus::Running, "pause")?;
        self.elapsed_secs = self.elapsed(now);
        self.status = ClockStatus::Paused;
        self.started_at = None;
        Ok(())
    }

    /// Reconstructs a synthetic start so remaining time picks up exactly
    /// where the pause left it, no matter how long ago that was.
    pub fn resume(
        &mut self,
        now: Timestamp,
    ) -> Result<(), MatchError> {
        self.require(ClockStatus::Paused, "resume")?;
        self.started_at = Some(now.minus(Duration::from_secs(self.elapsed_secs)));
        self.status = ClockStatus::Running;
        self.checkpoint_hold_until = Some(now.plus(Duration::from_millis(self.resume_hold_ms)));
        Ok(())
    }

    pub fn finish(
        &mut self,
        now: Timestamp,
    ) -> Result<(), MatchError> {
        match self.status {
            ClockStatus::Running | ClockStatus::Paused => {
                self.elapsed_secs = self.elapsed(now);
                self.status = ClockStatus::Finished;
                self.started_at = None;
                Ok(())
            }
            status => Err(MatchError::InvalidTransition { op: "finish", status }),
        }
    }

    /// Whether a periodic checkpoint write may fire. Never true while the
    /// post-resume hold is active.
    #[must_use]
    pub fn checkpoint_due(
        &self,
        now: Timestamp,
    ) -> bool {
        if self.status != ClockStatus::Running {
            return false;
        }
        match self.checkpoint_hold_until {
            Some(hold_until) => now >= hold_until,
            None => true,
        }
    }

    fn require(
        &self,
        required: ClockStatus,
        op: &'static str,
    ) -> Result<(), MatchError> {
        if self.status != required {
            return Err(MatchError::InvalidTransition {
                op,
                status: self.status,
            });
        }
        Ok(())
    }
}
