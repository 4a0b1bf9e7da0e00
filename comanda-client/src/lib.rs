//! Comanda Client - HTTP clients for the hosted services
//!
//! - `IdentityClient`: Firebase Identity Toolkit (email/password accounts)
//! - `FirestoreClient`: Firestore REST documents API
//! - `GeminiClient`: Gemini text generation

pub mod config;
pub mod error;
pub mod firestore;
pub mod gemini;
pub mod http;
pub mod identity;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use firestore::{FirestoreClient, RawDocument};
pub use gemini::{GeminiClient, GeminiConfig};
pub use http::TokenSlot;
pub use identity::{AuthResponse, IdentityClient};
