//! Identity port resolving chat usernames to user identifiers.

use async_trait::async_trait;
use thiserror::Error;

use crate::issue::domain::UserId;

/// Result type for identity lookups.
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Lookup contract against the host platform's user directory.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolves a username (without a leading `@`) to a user identifier.
    ///
    /// Returns `None` when no such user exists.
    async fn resolve(&self, username: &str) -> IdentityResult<Option<UserId>>;

    /// Returns the username used to mention the given user.
    async fn display_name(&self, user: &UserId) -> IdentityResult<String>;
}

/// Errors for identity lookups.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// The user is not known to the directory.
    #[error("unknown user: {0}")]
    UnknownUser(UserId),

    /// The directory could not be reached.
    #[error("identity directory unavailable: {0}")]
    Unavailable(String),
}
