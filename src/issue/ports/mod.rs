//! Port contracts for issue list management.
//!
//! Ports define infrastructure-agnostic interfaces used by issue services.

pub mod identity;
pub mod notifier;
pub mod repository;

pub use identity::{IdentityError, IdentityResolver, IdentityResult};
pub use notifier::{Notifier, NotifierError, NotifierResult};
pub use repository::{IssueRepository, IssueRepositoryError, IssueRepositoryResult};
