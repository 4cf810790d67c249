//! Issue records and the tracking record that links a sent issue back to its
//! sender.

use super::{IssueDomainError, IssueId, PostId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-empty issue text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueMessage(String);

impl IssueMessage {
    /// Creates a validated issue message.
    ///
    /// Surrounding whitespace is preserved; only blank input is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`IssueDomainError::EmptyMessage`] when the message is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, IssueDomainError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(IssueDomainError::EmptyMessage);
        }
        Ok(Self(raw))
    }

    /// Returns the message text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for IssueMessage {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for IssueMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single todo item.
///
/// Issues in a `my` or `in` list describe the record itself, so
/// `foreign_user` is the sender when the issue was received. Entries of an
/// `out` list are projections of a [`SentRecord`] built by
/// [`Issue::outgoing_view`], where `foreign_user` is the receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    id: IssueId,
    message: IssueMessage,
    created_at: DateTime<Utc>,
    post_id: Option<PostId>,
    foreign_user: Option<UserId>,
    foreign_issue: Option<IssueId>,
}

/// Parameter object for reconstructing a persisted issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedIssueData {
    /// Persisted issue identifier.
    pub id: IssueId,
    /// Persisted message text.
    pub message: IssueMessage,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted originating thread, if any.
    pub post_id: Option<PostId>,
    /// Persisted counterpart user, if the issue was sent.
    pub foreign_user: Option<UserId>,
    /// Persisted counterpart record, if the issue was sent.
    pub foreign_issue: Option<IssueId>,
}

impl Issue {
    /// Creates an unlinked issue for the caller's own queue.
    #[must_use]
    pub fn new(message: IssueMessage, post_id: Option<PostId>, clock: &impl Clock) -> Self {
        Self {
            id: IssueId::new(),
            message,
            created_at: clock.utc(),
            post_id,
            foreign_user: None,
            foreign_issue: None,
        }
    }

    /// Reconstructs an issue from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedIssueData) -> Self {
        Self {
            id: data.id,
            message: data.message,
            created_at: data.created_at,
            post_id: data.post_id,
            foreign_user: data.foreign_user,
            foreign_issue: data.foreign_issue,
        }
    }

    /// Projects a sent-tracking record into the sender's `out` list.
    ///
    /// The view carries the tracking record's identifier and timestamp, the
    /// linked issue's content, and points back at the receiver.
    #[must_use]
    pub fn outgoing_view(record: &SentRecord, linked: &Self) -> Self {
        Self {
            id: record.id(),
            message: linked.message.clone(),
            created_at: record.created_at(),
            post_id: linked.post_id.clone(),
            foreign_user: Some(record.receiver().clone()),
            foreign_issue: Some(linked.id),
        }
    }

    /// Returns the issue identifier.
    #[must_use]
    pub const fn id(&self) -> IssueId {
        self.id
    }

    /// Returns the issue message.
    #[must_use]
    pub const fn message(&self) -> &IssueMessage {
        &self.message
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the originating thread, if any.
    #[must_use]
    pub const fn post_id(&self) -> Option<&PostId> {
        self.post_id.as_ref()
    }

    /// Returns the counterpart user of a send, if any.
    #[must_use]
    pub const fn foreign_user(&self) -> Option<&UserId> {
        self.foreign_user.as_ref()
    }

    /// Returns the counterpart record of a send, if any.
    #[must_use]
    pub const fn foreign_issue(&self) -> Option<IssueId> {
        self.foreign_issue
    }

    /// Returns `true` when the issue is one side of a send.
    #[must_use]
    pub const fn is_linked(&self) -> bool {
        self.foreign_issue.is_some()
    }
}

/// Sender-side tracking record for an issue sent to another user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentRecord {
    id: IssueId,
    sender: UserId,
    receiver: UserId,
    issue_id: IssueId,
    created_at: DateTime<Utc>,
}

impl SentRecord {
    /// Reconstructs a tracking record from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: IssueId,
        sender: UserId,
        receiver: UserId,
        issue_id: IssueId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            sender,
            receiver,
            issue_id,
            created_at,
        }
    }

    /// Returns the tracking record identifier.
    #[must_use]
    pub const fn id(&self) -> IssueId {
        self.id
    }

    /// Returns the sending user.
    #[must_use]
    pub const fn sender(&self) -> &UserId {
        &self.sender
    }

    /// Returns the receiving user.
    #[must_use]
    pub const fn receiver(&self) -> &UserId {
        &self.receiver
    }

    /// Returns the identifier of the issue in the receiver's queue.
    #[must_use]
    pub const fn issue_id(&self) -> IssueId {
        self.issue_id
    }

    /// Returns the send timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Both halves of a send, built together so their links agree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentIssue {
    /// Issue placed in the receiver's `my` and `in` lists.
    pub issue: Issue,
    /// Tracking record placed in the sender's `out` list.
    pub record: SentRecord,
}

impl SentIssue {
    /// Creates a linked issue/tracking-record pair sharing one timestamp.
    #[must_use]
    pub fn new(
        sender: UserId,
        receiver: UserId,
        message: IssueMessage,
        post_id: Option<PostId>,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        let issue_id = IssueId::new();
        let record_id = IssueId::new();

        let issue = Issue {
            id: issue_id,
            message,
            created_at: timestamp,
            post_id,
            foreign_user: Some(sender.clone()),
            foreign_issue: Some(record_id),
        };
        let record = SentRecord {
            id: record_id,
            sender,
            receiver,
            issue_id,
            created_at: timestamp,
        };

        Self { issue, record }
    }

    /// Returns the receiving user.
    #[must_use]
    pub const fn receiver(&self) -> &UserId {
        self.record.receiver()
    }

    /// Returns the sending user.
    #[must_use]
    pub const fn sender(&self) -> &UserId {
        self.record.sender()
    }
}
