//! Page state machines.
//!
//! Each flow is a tagged union of the states a page can be in, so that
//! combinations such as "found and not found" cannot be represented.
//! Transitions consume the current state and return the next one; network
//! calls happen in [`crate::services`] between transitions.

use serde::Serialize;

use crate::repository::errors::RepositoryError;

pub mod board;
pub mod creation;
pub mod fill;

/// Confirmation toasts disappear after this many milliseconds.
pub const TOAST_DISMISS_MS: u64 = 5000;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

/// Transient notification shown over the page.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub severity: Severity,
    pub dismiss_after_ms: u64,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
            dismiss_after_ms: TOAST_DISMISS_MS,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
            dismiss_after_ms: TOAST_DISMISS_MS,
        }
    }
}

/// User-facing text for a failed remote call, preferring the API's own
/// message when it sent one.
pub(crate) fn failure_message(err: &RepositoryError, fallback: &str) -> String {
    match err {
        RepositoryError::Rejected { message, .. } if !message.trim().is_empty() => {
            message.clone()
        }
        RepositoryError::Transport(_) => {
            "Não foi possível conectar ao servidor. Tente novamente.".to_string()
        }
        _ => fallback.to_string(),
    }
}
