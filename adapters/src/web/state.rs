use std::sync::Arc;

use application::ports::in_::{QueueService, RotationService, SessionService};
use application::ports::out_::{AsyncTimer, ParticipantDirectory, TimeSource};
use domain::GroupId;

use super::websocket::WebSocketNotifier;

/// One server instance fronts one session group (one pitch, one line).
pub struct AppState {
    pub group_id: GroupId,
    pub sessions: Arc<SessionService>,
    pub rotations: Arc<RotationService>,
    pub queue: Arc<QueueService>,
    pub directory: Arc<dyn ParticipantDirectory>,
    pub notifier: Arc<WebSocketNotifier>,
    pub timer: Arc<dyn AsyncTimer>,
    pub time: Arc<dyn TimeSource>,
}
