mod http;
mod state;
mod websocket;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

pub use http::ApiError;
pub use state::AppState;
pub use websocket::{WebSocketNotifier, handle_connection};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/queue", get(http::get_queue))
        .route("/queue/join", post(http::join_queue))
        .route("/queue/leave", post(http::leave_queue))
        .route("/sessions", post(http::create_session))
        .route("/sessions/{id}", get(http::get_session))
        .route("/sessions/{id}/summary", get(http::get_summary))
        .route("/sessions/{id}/start", post(http::start_session))
        .route("/sessions/{id}/pause", post(http::pause_session))
        .route("/sessions/{id}/resume", post(http::resume_session))
        .route("/sessions/{id}/goals", post(http::record_goal))
        .route("/sessions/{id}/goals/undo", post(http::undo_goal))
        .route("/sessions/{id}/substitutions/begin", post(http::begin_substitution))
        .route("/sessions/{id}/substitutions", post(http::complete_substitution))
        .route("/sessions/{id}/substitutions/undo", post(http::undo_substitution))
        .route("/sessions/{id}/finalize", post(http::finalize_session))
        .route("/ws", get(handle_connection))
        .with_state(state)
}
