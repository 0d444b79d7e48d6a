pub mod errors;
pub mod events;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod server;
pub mod table;

pub use errors::{ErrorResponse, ErrorSeverity, IntoErrorResponse};
pub use events::{EventBus, EventSubscription, TableEvent};
pub use logging::{init_logging, LogEntry, LogFormat, TestLogSubscriber};
pub use metrics::{MetricsCollector, MetricsSnapshot};
pub use server::{AppContext, ServerConfig, ServerError, ServerHandle, WebServer};
pub use table::{IntentResponse, SessionId, TableError, TableService, DEFAULT_SESSION_TTL};
