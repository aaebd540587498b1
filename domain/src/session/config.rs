use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Side;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub duration: Duration,
    pub roster_size: usize,
    /// Cadence of the ClockSync tick while the session is live.
    pub sync_interval: Duration,
    /// Minimum gap between durable checkpoints of a running clock.
    pub checkpoint_interval: Duration,
    /// Checkpoint suppression window right after a resume.
    pub resume_hold: Duration,
    /// Which side holds the pitch from the previous match.
    pub incumbent: Side,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(600),
            roster_size: 6,
            sync_interval: Duration::from_secs(1),
            checkpoint_interval: Duration::from_secs(10),
            resume_hold: Duration::from_secs(3),
            incumbent: Side::A,
        }
    }
}
