//! Notifier port for bot messages and client refresh events.
//!
//! Delivery is best-effort: services log failures and never surface them to
//! the acting user.

use async_trait::async_trait;
use thiserror::Error;

use crate::issue::domain::{PostId, UserId};

/// Result type for notification delivery.
pub type NotifierResult<T> = Result<T, NotifierError>;

/// Outbound messaging contract.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends a direct bot message to the user.
    async fn notify(&self, recipient: &UserId, text: &str) -> NotifierResult<()>;

    /// Replies in the thread an issue originated from.
    async fn reply(&self, post: &PostId, text: &str) -> NotifierResult<()>;

    /// Asks the user's clients to reload their lists.
    async fn refresh(&self, user: &UserId) -> NotifierResult<()>;
}

/// Errors for notification delivery.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("notification delivery failed: {0}")]
pub struct NotifierError(pub String);
