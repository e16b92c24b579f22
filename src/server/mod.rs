mod handler;
mod router;
mod state;

pub use handler::get_event_log;
pub use router::{EVENTS_LOG_ROUTE, build_router};
pub use state::AppState;
