use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use application::ports::in_::SessionService;
use application::ports::out_::AsyncTimer;
use domain::{MatchAction, MatchEffect, SessionId};

/// Drives the periodic ClockSync tick for one session on the tokio runtime.
/// The state machine re-arms itself through `ScheduleSync` effects; when no
/// re-arm comes back (the session finished) the loop winds down.
pub fn spawn_sync_loop(
    service: Arc<SessionService>,
    timer: Arc<dyn AsyncTimer>,
    session_id: SessionId,
    effects: &[MatchEffect],
) {
    let Some(delay) = next_delay(effects) else {
        return;
    };
    tokio::spawn(async move {
        run(service, timer, session_id, delay).await;
    });
}

async fn run(
    service: Arc<SessionService>,
    timer: Arc<dyn AsyncTimer>,
    session_id: SessionId,
    mut delay: Duration,
) {
    loop {
        timer.sleep(delay).await;
        match service.apply(session_id, MatchAction::ClockSync).await {
            Ok(effects) => match next_delay(&effects) {
                Some(next) => delay = next,
                None => {
                    debug!(?session_id, "sync loop wound down");
                    break;
                }
            },
            Err(err) => {
                warn!(?session_id, error = %err, "sync loop stopped");
                break;
            }
        }
    }
}

fn next_delay(effects: &[MatchEffect]) -> Option<Duration> {
    effects.iter().find_map(|effect| match effect {
        MatchEffect::ScheduleSync { delay } => Some(*delay),
        _ => None,
    })
}
