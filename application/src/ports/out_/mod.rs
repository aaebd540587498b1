mod common;
mod directory;
mod notifier;
mod storage;

pub use common::{AsyncTimer, TimeSource};
pub use directory::ParticipantDirectory;
pub use notifier::MatchNotifier;
pub use storage::{QueueStore, SessionStore, StorageError, StreakStore, Version, Versioned};
