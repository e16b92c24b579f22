mod entry;
mod error;
mod filter;
mod source;

pub use entry::LogEntry;
pub use error::{ErrorType, EventsError};
pub use filter::{EventQuery, FilterCriteria, parse_date};
pub use source::{LogSource, sort_newest_first};
