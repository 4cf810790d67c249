//! Domain model for todo issue lists.
//!
//! The issue domain models queue entries, the send linkage between two users,
//! and list identities while keeping all infrastructure concerns outside of
//! the domain boundary.

mod error;
mod ids;
mod issue;
mod list;

pub use error::{IssueDomainError, ParseListKindError};
pub use ids::{IssueId, PostId, UserId};
pub use issue::{Issue, IssueMessage, PersistedIssueData, SentIssue, SentRecord};
pub use list::ListKind;
