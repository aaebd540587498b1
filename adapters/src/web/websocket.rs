use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::sync::{Mutex as TokioMutex, RwLock};
use tracing::{debug, info};

use application::ports::out_::MatchNotifier;
use domain::{GroupId, MatchEvent, MatchResult, ParticipantId, Score, SessionId};

use super::state::AppState;

pub(crate) type WebSocketSender = SplitSink<WebSocket, Message>;

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum PushedEvent<'a> {
    ClockTick {
        session_id: SessionId,
        remaining_secs: u64,
    },
    ScoreChanged {
        session_id: SessionId,
        score: Score,
    },
    SessionFinalized {
        result: &'a MatchResult,
    },
    RotationComputed {
        group_id: GroupId,
        new_order: &'a [ParticipantId],
    },
    SessionEvent {
        session_id: SessionId,
        event: &'a MatchEvent,
    },
}

/// Fans every notification out to all connected viewers. The stream is
/// strictly one-way; commands come in through the HTTP surface.
pub struct WebSocketNotifier {
    connections: RwLock<Vec<(u64, TokioMutex<WebSocketSender>)>>,
    next_id: AtomicU64,
}

impl WebSocketNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    pub async fn register(
        &self,
        sender: WebSocketSender,
    ) -> u64 {
        let conn_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.connections.write().await.push((conn_id, TokioMutex::new(sender)));
        conn_id
    }

    pub async fn unregister(
        &self,
        conn_id: u64,
    ) {
        self.connections.write().await.retain(|(id, _)| *id != conn_id);
    }

    async fn broadcast(
        &self,
        event: &PushedEvent<'_>,
    ) {
        let message = serde_json::to_string(event).unwrap_or_default();
        let connections = self.connections.read().await;
        for (conn_id, sender) in connections.iter() {
            debug!(conn_id, message = %message, "-> pushing");
            let _ = sender.lock().await.send(Message::Text(message.clone().into())).await;
        }
    }
}

impl Default for WebSocketNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MatchNotifier for WebSocketNotifier {
    async fn clock_tick(
        &self,
        session_id: SessionId,
        remaining_secs: u64,
    ) {
        self.broadcast(&PushedEvent::ClockTick {
            session_id,
            remaining_secs,
        })
        .await;
    }

    async fn score_changed(
        &self,
        session_id: SessionId,
        score: Score,
    ) {
        self.broadcast(&PushedEvent::ScoreChanged { session_id, score }).await;
    }

    async fn session_finalized(
        &self,
        result: &MatchResult,
    ) {
        self.broadcast(&PushedEvent::SessionFinalized { result }).await;
    }

    async fn rotation_computed(
        &self,
        group_id: GroupId,
        new_order: &[ParticipantId],
    ) {
        self.broadcast(&PushedEvent::RotationComputed { group_id, new_order }).await;
    }

    async fn session_event(
        &self,
        session_id: SessionId,
        event: &MatchEvent,
    ) {
        self.broadcast(&PushedEvent::SessionEvent { session_id, event }).await;
    }
}

pub async fn handle_connection(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| async move {
        let (sender, receiver) = socket.split();
        let conn_id = state.notifier.register(sender).await;
        info!(conn_id, "viewer connected");

        drain(conn_id, receiver).await;

        state.notifier.unregister(conn_id).await;
        info!(conn_id, "viewer disconnected");
    })
}

async fn drain(
    conn_id: u64,
    mut receiver: SplitStream<WebSocket>,
) {
    while let Some(Ok(message)) = receiver.next().await {
        if let Message::Text(text) = message {
            debug!(conn_id, message = %text, "<- ignoring inbound message on observer stream");
        }
    }
}
