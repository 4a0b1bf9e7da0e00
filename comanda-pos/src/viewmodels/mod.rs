//! View-models
//!
//! One per screen. Each holds observable fields the UI reads every frame
//! and exposes async operations plus `spawn_*` variants that run them on a
//! tokio task. No operation returns an error to the UI: failures land in
//! the screen's [`ViewStatus`].

pub mod employees;
pub mod finance;
pub mod history;
pub mod inventory;
pub mod login;
pub mod orders;

pub use employees::EmployeesViewModel;
pub use finance::FinanceViewModel;
pub use history::HistoryViewModel;
pub use inventory::InventoryViewModel;
pub use login::LoginViewModel;
pub use orders::OrdersViewModel;

use std::future::Future;

use shared::{AppError, AppResult, ErrorClass};

use crate::state::Observable;

/// A message for the user
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Info(text) | Notice::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

/// Busy flag plus the last notice of a screen
#[derive(Debug, Clone, Default)]
pub struct ViewStatus {
    pub busy: Observable<bool>,
    pub notice: Observable<Option<Notice>>,
}

impl ViewStatus {
    pub fn info(&self, text: impl Into<String>) {
        self.notice.set(Some(Notice::Info(text.into())));
    }

    pub fn error(&self, text: impl Into<String>) {
        self.notice.set(Some(Notice::Error(text.into())));
    }

    pub fn clear(&self) {
        self.notice.set(None);
    }

    /// Report an adapter failure
    pub fn fail(&self, context: &str, err: &AppError) {
        match err.class() {
            ErrorClass::Validation | ErrorClass::NotFound => {
                tracing::debug!(code = ?err.code, error = %err, "{}", context)
            }
            _ => tracing::warn!(code = ?err.code, error = %err, "{}", context),
        }
        self.error(format!("{}: {}", context, err));
    }

    /// Run an operation with the busy flag raised
    ///
    /// On failure the error is reported under `context` and `None` returned.
    pub async fn track<T, F>(&self, context: &str, op: F) -> Option<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        self.busy.set(true);
        let result = op.await;
        self.busy.set(false);
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.fail(context, &e);
                None
            }
        }
    }
}
