//! Core: configuration and application state

pub mod config;
pub mod seed;
pub mod state;

pub use config::{Config, ConfigError, StoreBackend};
pub use state::AppState;
