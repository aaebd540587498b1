use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use application::ServiceError;
use application::ports::out_::StorageError;
use domain::{MatchConfig, MatchResult, MatchSession, ParticipantId, QueueOutcome, RotationError, SessionId, Side};

use crate::sync_loop::spawn_sync_loop;

use super::state::AppState;

pub struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ServiceError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Match(_) | ServiceError::Rotation(_) => StatusCode::CONFLICT,
            ServiceError::Storage(StorageError::StaleWrite { .. }) => StatusCode::CONFLICT,
            ServiceError::Storage(StorageError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[derive(Serialize)]
pub struct QueueResponse {
    order: Vec<ParticipantId>,
    count: usize,
}

pub async fn get_queue(State(state): State<Arc<AppState>>) -> Result<Json<QueueResponse>, ApiError> {
    let order = state.queue.current_order(state.group_id).await?;
    let count = order.len();
    Ok(Json(QueueResponse { order, count }))
}

#[derive(Deserialize)]
pub struct QueueEditRequest {
    participant_id: ParticipantId,
}

pub async fn join_queue(
    State(state): State<Arc<AppState>>,
    Json(body): Json<QueueEditRequest>,
) -> Result<Json<QueueOutcome>, ApiError> {
    let outcome = state.queue.join(state.group_id, body.participant_id).await?;
    Ok(Json(outcome))
}

pub async fn leave_queue(
    State(state): State<Arc<AppState>>,
    Json(body): Json<QueueEditRequest>,
) -> Result<Json<QueueOutcome>, ApiError> {
    let outcome = state.queue.leave(state.group_id, body.participant_id).await?;
    Ok(Json(outcome))
}

#[derive(Deserialize)]
pub struct CreateSessionRequest {
    side_a: Vec<ParticipantId>,
    side_b: Vec<ParticipantId>,
    duration_secs: Option<u64>,
}

#[derive(Serialize)]
pub struct CreateSessionResponse {
    session_id: SessionId,
}

pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateSessionRequest>,
) -> Result<Json<CreateSessionResponse>, ApiError> {
    let mut config = MatchConfig {
        roster_size: body.side_a.len(),
        ..MatchConfig::default()
    };
    if let Some(secs) = body.duration_secs {
        config.duration = Duration::from_secs(secs);
    }
    let session_id = state
        .sessions
        .create_session(state.group_id, body.side_a, body.side_b, config)
        .await?;
    Ok(Json(CreateSessionResponse { session_id }))
}

#[derive(Serialize)]
pub struct SessionView {
    remaining_secs: u64,
    session: MatchSession,
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let session = state.sessions.snapshot(SessionId(id)).await?;
    let remaining_secs = session.clock().remaining(state.time.now());
    Ok(Json(SessionView {
        remaining_secs,
        session,
    }))
}

pub async fn start_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let effects = state.sessions.start(SessionId(id)).await?;
    spawn_sync_loop(Arc::clone(&state.sessions), Arc::clone(&state.timer), SessionId(id), &effects);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn pause_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.sessions.pause(SessionId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn resume_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.sessions.resume(SessionId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct RecordGoalRequest {
    /// Beneficiary side; for an own goal pass the side that gains the point
    /// and no scorer.
    side: Side,
    scorer: Option<ParticipantId>,
}

pub async fn record_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<RecordGoalRequest>,
) -> Result<StatusCode, ApiError> {
    state.sessions.record_goal(SessionId(id), body.side, body.scorer).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn undo_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.sessions.undo_goal(SessionId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct BeginSubstitutionRequest {
    side: Side,
}

pub async fn begin_substitution(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<BeginSubstitutionRequest>,
) -> Result<StatusCode, ApiError> {
    state.sessions.begin_substitution(SessionId(id), body.side).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct CompleteSubstitutionRequest {
    side: Side,
    player_out: ParticipantId,
    player_in: ParticipantId,
}

pub async fn complete_substitution(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<CompleteSubstitutionRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .sessions
        .complete_substitution(SessionId(id), body.side, body.player_out, body.player_in)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn undo_substitution(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.sessions.undo_substitution(SessionId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct FinalizeRequest {
    tie_break: Option<Side>,
}

#[derive(Serialize)]
pub struct FinalizeResponse {
    result: MatchResult,
    new_order: Option<Vec<ParticipantId>>,
    next_incumbent: Option<Vec<ParticipantId>>,
    next_challenger: Option<Vec<ParticipantId>>,
    /// Set when the waiting line cannot field the next side yet; the match
    /// stays finished and rotation is retried once more players join.
    rotation_pending: Option<String>,
}

pub async fn finalize_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<FinalizeRequest>,
) -> Result<Json<FinalizeResponse>, ApiError> {
    let result = state.sessions.finalize(SessionId(id), body.tie_break).await?;
    match state.rotations.apply(&result).await {
        Ok(rotation) => Ok(Json(FinalizeResponse {
            result,
            new_order: Some(rotation.new_order),
            next_incumbent: Some(rotation.next_incumbent),
            next_challenger: Some(rotation.next_challenger),
            rotation_pending: None,
        })),
        Err(err @ ServiceError::Rotation(RotationError::InsufficientQueue { .. })) => Ok(Json(FinalizeResponse {
            result,
            new_order: None,
            next_incumbent: None,
            next_challenger: None,
            rotation_pending: Some(err.to_string()),
        })),
        Err(err) => Err(err.into()),
    }
}

#[derive(Serialize)]
pub struct SummaryResponse {
    score_a: u32,
    score_b: u32,
    side_a: Vec<String>,
    side_b: Vec<String>,
    finished: bool,
}

pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let session = state.sessions.snapshot(SessionId(id)).await?;
    let score = session.score();

    let mut side_a = Vec::new();
    for &player in session.rosters().side(Side::A) {
        side_a.push(resolve(&state, player).await);
    }
    let mut side_b = Vec::new();
    for &player in session.rosters().side(Side::B) {
        side_b.push(resolve(&state, player).await);
    }

    Ok(Json(SummaryResponse {
        score_a: score.side_a,
        score_b: score.side_b,
        side_a,
        side_b,
        finished: session.is_finished(),
    }))
}

async fn resolve(
    state: &AppState,
    player: ParticipantId,
) -> String {
    state
        .directory
        .resolve_name(player)
        .await
        .unwrap_or_else(|| player.0.to_string())
}
