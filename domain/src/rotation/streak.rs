use serde::{Deserialize, Serialize};

/// Outcome of a finalized match expressed relative to the incumbent slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakOutcome {
    IncumbentWon,
    ChallengerWon,
    Tie,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakSignal {
    /// Incumbent keeps the pitch, streak extended below the cap.
    Extended,
    /// Streak hit the cap: both sides must rotate out; caller resets.
    CapReached,
    /// Challenger takes over the incumbent slot with one win banked.
    NewIncumbent,
    /// Caller must supply a tie-break priority side, then reset.
    TieNeedsPriority,
}

/// Persisted count of consecutive wins by the side holding the incumbent
/// slot. Mutated only on match finalization by the rotation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinStreak {
    count: u32,
    cap: u32,
}

impl WinStreak {
    #[must_use]
    pub fn new(cap: u32) -> Self {
        Self { count: 0, cap }
    }

    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    #[must_use]
    pub fn cap(&self) -> u32 {
        self.cap
    }

    pub fn observe(
        &mut self,
        outcome: StreakOutcome,
    ) -> StreakSignal {
        match outcome {
            StreakOutcome::IncumbentWon => {
                self.count += 1;
                if self.count >= self.cap {
                    StreakSignal::CapReached
                } else {
                    StreakSignal::Extended
                }
            }
            StreakOutcome::ChallengerWon => {
                self.count = 1;
                StreakSignal::NewIncumbent
            }
            StreakOutcome::Tie => StreakSignal::TieNeedsPriority,
        }
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}

impl Default for WinStreak {
    fn default() -> Self {
        Self::new(3)
    }
}
