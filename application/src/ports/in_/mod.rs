mod queue_service;
mod rotation_service;
mod session_service;

pub use queue_service::QueueService;
pub use rotation_service::RotationService;
pub use session_service::{ServiceConfig, SessionService};
