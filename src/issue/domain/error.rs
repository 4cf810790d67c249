//! Error types for issue domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain issue values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IssueDomainError {
    /// The issue message is empty after trimming.
    #[error("issue message must not be empty")]
    EmptyMessage,

    /// The user identifier is empty after trimming.
    #[error("user identifier must not be empty")]
    EmptyUserId,

    /// The post identifier is empty after trimming.
    #[error("post identifier must not be empty")]
    EmptyPostId,
}

/// Error returned while parsing list kinds from user input or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown list: {0}")]
pub struct ParseListKindError(pub String);
