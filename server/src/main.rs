use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tracing::info;

use adapters::{AppState, InMemoryStore, StaticDirectory, SystemTimeSource, TokioTimer, WebSocketNotifier, router};
use application::ports::in_::{QueueService, RotationService, ServiceConfig, SessionService};
use application::ports::out_::{
    AsyncTimer, MatchNotifier, ParticipantDirectory, QueueStore, SessionStore, StreakStore, TimeSource,
};
use domain::GroupId;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let ws_adapter = Arc::new(WebSocketNotifier::new());
    let store = Arc::new(InMemoryStore::new());
    let time: Arc<dyn TimeSource> = Arc::new(SystemTimeSource);
    let timer: Arc<dyn AsyncTimer> = Arc::new(TokioTimer);
    let service_config = ServiceConfig::default();

    // Session service dependencies
    let notifier: Arc<dyn MatchNotifier> = ws_adapter.clone();
    let session_store: Arc<dyn SessionStore> = store.clone();
    let session_service = SessionService::new(
        session_store,
        notifier.clone(),
        time.clone(),
        service_config.clone(),
    );

    // Rotation service dependencies
    let queue_store: Arc<dyn QueueStore> = store.clone();
    let streak_store: Arc<dyn StreakStore> = store.clone();
    let rotation_service = RotationService::new(queue_store.clone(), streak_store, notifier, service_config.clone());

    let queue_service = QueueService::new(queue_store, service_config);

    let directory: Arc<dyn ParticipantDirectory> = Arc::new(StaticDirectory::new());

    // One instance fronts one pitch and its waiting line.
    let app_state = Arc::new(AppState {
        group_id: GroupId::new(),
        sessions: Arc::new(session_service),
        rotations: Arc::new(rotation_service),
        queue: Arc::new(queue_service),
        directory,
        notifier: ws_adapter,
        timer,
        time,
    });

    let app = router(app_state).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    info!("Server listening on 0.0.0.0:3000");
    axum::serve(listener, app).await.unwrap();
    info!("Server shut down");
}
