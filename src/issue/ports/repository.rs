//! Repository port for issue list persistence.
//!
//! Every mutating method is one atomic unit: implementations must make the
//! whole change visible to readers at once or not at all.

use crate::issue::domain::{Issue, IssueId, ListKind, SentIssue, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for issue repository operations.
pub type IssueRepositoryResult<T> = Result<T, IssueRepositoryError>;

/// Issue list persistence contract.
#[async_trait]
pub trait IssueRepository: Send + Sync {
    /// Appends an unlinked issue to the end of the owner's `my` list.
    ///
    /// # Errors
    ///
    /// Returns [`IssueRepositoryError::DuplicateIssue`] when the issue ID
    /// already exists.
    async fn append(&self, owner: &UserId, issue: &Issue) -> IssueRepositoryResult<()>;

    /// Stores both halves of a send.
    ///
    /// The issue is appended to the receiver's `my` and `in` lists and the
    /// tracking record to the sender's `out` list in a single atomic unit.
    ///
    /// # Errors
    ///
    /// Returns [`IssueRepositoryError::DuplicateIssue`] when either
    /// identifier already exists.
    async fn append_sent(&self, sent: &SentIssue) -> IssueRepositoryResult<()>;

    /// Removes and returns the oldest issue in the owner's `my` list.
    ///
    /// Any `in` entry for the issue and the sender's tracking record are
    /// retired in the same atomic unit. Returns `None` when the list is
    /// empty, leaving every list untouched. Concurrent callers never receive
    /// the same issue.
    async fn pop_front(&self, owner: &UserId) -> IssueRepositoryResult<Option<Issue>>;

    /// Returns the requested list for the user, oldest first.
    ///
    /// `out` entries are projected with [`Issue::outgoing_view`].
    async fn list(&self, user: &UserId, kind: ListKind) -> IssueRepositoryResult<Vec<Issue>>;
}

/// Errors returned by issue repository implementations.
#[derive(Debug, Clone, Error)]
pub enum IssueRepositoryError {
    /// An issue or tracking record with the same identifier already exists.
    #[error("duplicate issue identifier: {0}")]
    DuplicateIssue(IssueId),

    /// A list entry references a record that does not exist.
    #[error("dangling list entry {issue} in '{kind}' list of user {user}")]
    DanglingEntry {
        /// Owner of the list holding the entry.
        user: UserId,
        /// List holding the entry.
        kind: ListKind,
        /// Identifier with no backing record.
        issue: IssueId,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl IssueRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
