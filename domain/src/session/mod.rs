mod action;
mod clock;
mod config;
mod effect;
mod error;
mod result;
mod roster;
mod score;
mod state;


pub use action::MatchAction;
pub use clock::{ClockState, ClockStatus};
pub use config::MatchConfig;
pub use effect::{MatchEffect, MatchEvent};
pub use error::MatchError;
pub use result::{MatchResult, MatchVerdict};
pub use roster::{RosterLedger, Substitution};
pub use score::{Goal, GoalId, ScoreLedger};
pub use state::{MatchSession, PauseCause};
