use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;

use application::ports::out_::{AsyncTimer, TimeSource};
use domain::Timestamp;

pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_millis() as u64;
        Timestamp::from_millis(millis)
    }
}

pub struct TokioTimer;

#[async_trait]
impl AsyncTimer for TokioTimer {
    async fn sleep(
        &self,
        duration: Duration,
    ) {
        tokio::time::sleep(duration).await;
    }
}
