mod engine;
mod queue;
mod streak;

#[cfg(test)]
mod tests;

pub use engine::{Rotation, RotationError, rotate};
pub use queue::{QueueCommand, QueueOutcome, RotationQueue};
pub use streak::{StreakOutcome, StreakSignal, WinStreak};
