pub mod cli;
pub mod client;
pub mod config;
pub mod events;
pub mod run;
pub mod server;
pub mod types;

pub use cli::Cli;
pub use config::Config;
pub use server::{AppState, build_router};
