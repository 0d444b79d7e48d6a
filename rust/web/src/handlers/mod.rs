pub mod health;
pub mod sse;
pub mod table;

pub use health::health;
pub use sse::stream_events;
pub use table::{get_metrics, get_state, join, leave, play, slap};
