//! Service layer behind the add, send, pop, and list operations.

use crate::issue::{
    domain::{Issue, IssueDomainError, IssueId, IssueMessage, ListKind, PostId, SentIssue, UserId},
    ports::{IdentityResolver, IssueRepository, IssueRepositoryError},
};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::{info, warn};

/// How a failure should be presented to the acting user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller supplied invalid input; show a corrective message.
    User,
    /// The target of the operation is absent; show a benign message.
    NotFound,
    /// Persistence or consistency failure; log it and show a generic message.
    System,
}

/// Service-level errors for issue list operations.
#[derive(Debug, Error)]
pub enum IssueListError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] IssueDomainError),
    /// The user's `my` list has nothing to pop.
    #[error("There are no Todos to pop.")]
    EmptyList(UserId),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] IssueRepositoryError),
}

impl IssueListError {
    /// Classifies the error for presentation.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::User,
            Self::EmptyList(_) => ErrorKind::NotFound,
            Self::Repository(_) => ErrorKind::System,
        }
    }
}

/// Result type for issue list service operations.
pub type IssueListResult<T> = Result<T, IssueListError>;

/// Issue list orchestration service.
///
/// Built once at startup and shared by every request handler; clones share
/// the repository handle and the display-name cache.
pub struct IssueListService<R, I, C>
where
    R: IssueRepository + ?Sized,
    I: IdentityResolver + ?Sized,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    identity: Arc<I>,
    clock: Arc<C>,
    display_names: Arc<RwLock<HashMap<UserId, String>>>,
}

impl<R, I, C> Clone for IssueListService<R, I, C>
where
    R: IssueRepository + ?Sized,
    I: IdentityResolver + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            identity: Arc::clone(&self.identity),
            clock: Arc::clone(&self.clock),
            display_names: Arc::clone(&self.display_names),
        }
    }
}

impl<R, I, C> IssueListService<R, I, C>
where
    R: IssueRepository + ?Sized,
    I: IdentityResolver + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new issue list service.
    #[must_use]
    pub fn new(repository: Arc<R>, identity: Arc<I>, clock: Arc<C>) -> Self {
        Self {
            repository,
            identity,
            clock,
            display_names: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Appends a new issue to the end of the owner's `my` list.
    ///
    /// # Errors
    ///
    /// Returns [`IssueListError::Domain`] when the message is blank, or
    /// [`IssueListError::Repository`] when persistence fails.
    pub async fn add_issue(
        &self,
        owner: &UserId,
        message: &str,
        post_id: Option<PostId>,
    ) -> IssueListResult<Issue> {
        let message = IssueMessage::new(message)?;
        let issue = Issue::new(message, post_id, &*self.clock);
        self.repository.append(owner, &issue).await?;
        info!(user = %owner, issue = %issue.id(), "added issue");
        Ok(issue)
    }

    /// Sends a new issue to another user's `my` list.
    ///
    /// The receiver's issue and the sender's tracking record become visible
    /// together. Sending to oneself behaves exactly like
    /// [`add_issue`](Self::add_issue) and creates no link.
    ///
    /// Returns the identifier of the issue in the receiver's queue.
    ///
    /// # Errors
    ///
    /// Returns [`IssueListError::Domain`] when the message is blank, or
    /// [`IssueListError::Repository`] when persistence fails; nothing is
    /// stored in either case.
    pub async fn send_issue(
        &self,
        sender: &UserId,
        receiver: &UserId,
        message: &str,
        post_id: Option<PostId>,
    ) -> IssueListResult<IssueId> {
        if sender == receiver {
            return self
                .add_issue(sender, message, post_id)
                .await
                .map(|issue| issue.id());
        }

        let message = IssueMessage::new(message)?;
        let sent = SentIssue::new(
            sender.clone(),
            receiver.clone(),
            message,
            post_id,
            &*self.clock,
        );
        self.repository.append_sent(&sent).await?;
        info!(
            sender = %sender,
            receiver = %receiver,
            issue = %sent.issue.id(),
            "sent issue"
        );
        Ok(sent.issue.id())
    }

    /// Removes and returns the oldest issue in the owner's `my` list.
    ///
    /// A received issue keeps its `foreign_user`, so the caller can tell the
    /// sender; the sender's tracking record is retired with the pop.
    ///
    /// # Errors
    ///
    /// Returns [`IssueListError::EmptyList`] when there is nothing to pop, or
    /// [`IssueListError::Repository`] when persistence fails.
    pub async fn pop_issue(&self, owner: &UserId) -> IssueListResult<Issue> {
        let issue = self
            .repository
            .pop_front(owner)
            .await?
            .ok_or_else(|| IssueListError::EmptyList(owner.clone()))?;
        info!(user = %owner, issue = %issue.id(), linked = issue.is_linked(), "popped issue");
        Ok(issue)
    }

    /// Returns the requested list, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`IssueListError::Repository`] when persistence lookup fails.
    pub async fn issue_list(&self, user: &UserId, kind: ListKind) -> IssueListResult<Vec<Issue>> {
        Ok(self.repository.list(user, kind).await?)
    }

    /// Returns the name used to mention the user.
    ///
    /// Successful lookups are cached. When the directory cannot answer, the
    /// raw user identifier is returned instead and nothing is cached.
    pub async fn user_name(&self, user: &UserId) -> String {
        if let Some(name) = self.cached_name(user) {
            return name;
        }

        match self.identity.display_name(user).await {
            Ok(name) => {
                if let Ok(mut names) = self.display_names.write() {
                    names.insert(user.clone(), name.clone());
                }
                name
            }
            Err(err) => {
                warn!(user = %user, error = %err, "display name lookup failed");
                user.as_str().to_owned()
            }
        }
    }

    fn cached_name(&self, user: &UserId) -> Option<String> {
        self.display_names
            .read()
            .ok()
            .and_then(|names| names.get(user).cloned())
    }
}
