//! Reactive state used by the view-models

pub mod observable;

pub use observable::{Observable, Subscription};
