//! Comanda - restaurant point of sale
//!
//! # Module layout
//!
//! ```text
//! comanda-pos/src/
//! ├── core/          # configuration, application state, demo seed
//! ├── db/            # document store trait, memory + Firestore backends, repositories
//! ├── auth/          # identity providers, login and role resolution
//! ├── advisory/      # language model prompts and fallbacks
//! ├── state/         # observable values
//! ├── viewmodels/    # per-screen state and operations
//! ├── ui/            # terminal screens
//! └── utils/         # logging
//! ```

pub mod advisory;
pub mod auth;
pub mod core;
pub mod db;
pub mod state;
pub mod ui;
pub mod utils;
pub mod viewmodels;

pub use core::{AppState, Config, ConfigError};
pub use state::{Observable, Subscription};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Log directory used when `LOG_DIR` is not set
///
/// The terminal UI owns stdout/stderr, so logs always go to a file.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Initialize logging from the loaded configuration
pub fn setup_logging(config: &Config) {
    let dir = config.log_dir.as_deref().unwrap_or(DEFAULT_LOG_DIR);
    init_logger_with_file(Some(config.log_level.as_str()), Some(dir));
}
