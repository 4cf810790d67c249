//! Diesel row models for issue list persistence.

use super::schema::{todo_issues, todo_list_entries, todo_sent_records};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row model for issue records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = todo_issues)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct IssueRow {
    /// Issue identifier.
    pub id: uuid::Uuid,
    /// Owning user.
    pub owner_id: String,
    /// Issue text.
    pub message: String,
    /// Originating thread.
    pub post_id: Option<String>,
    /// Sender of a received issue.
    pub foreign_user_id: Option<String>,
    /// Sender-side tracking record.
    pub foreign_issue_id: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Row model for sent-tracking records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = todo_sent_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SentRecordRow {
    /// Tracking record identifier.
    pub id: uuid::Uuid,
    /// Sending user.
    pub sender_id: String,
    /// Receiving user.
    pub receiver_id: String,
    /// Issue in the receiver's queue.
    pub issue_id: uuid::Uuid,
    /// Send timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for list entries; the position is assigned by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = todo_list_entries)]
pub struct NewListEntryRow {
    /// List owner.
    pub user_id: String,
    /// List kind.
    pub list_kind: String,
    /// Issue or tracking record identifier.
    pub entry_id: uuid::Uuid,
}
