mod in_memory;
mod sync_loop;
mod tokio_time;
mod web;

pub use in_memory::{InMemoryStore, ManualTimeSource, RecordingNotifier, StaticDirectory};
pub use sync_loop::spawn_sync_loop;
pub use tokio_time::{SystemTimeSource, TokioTimer};
pub use web::{ApiError, AppState, WebSocketNotifier, handle_connection, router};
