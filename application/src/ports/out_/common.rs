use std::time::Duration;

use async_trait::async_trait;

use domain::Timestamp;

/// The only place wall-clock time enters the system; the domain itself takes
/// `now` as a parameter everywhere.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> Timestamp;
}

#[async_trait]
pub trait AsyncTimer: Send + Sync {
    async fn sleep(
        &self,
        duration: Duration,
    );
}
