//! Authentication
//!
//! Password login against an identity provider, then role lookup in the
//! employee collection.

pub mod provider;
pub mod service;

pub use provider::{FirebaseIdentity, Identity, IdentityProvider, LocalIdentity};
pub use service::{AuthService, Session, UnprovisionedPolicy};
