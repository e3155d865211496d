//! HTTP front end of the scavenger hunt.

pub mod config;
pub mod server;

pub use config::Config;
pub use server::{AppState, create_router, run};
