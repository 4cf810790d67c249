//! In-memory adapters for issue list ports.

mod identity;
mod notifier;
mod store;

pub use identity::InMemoryIdentityDirectory;
pub use notifier::{Delivery, RecordingNotifier};
pub use store::InMemoryIssueRepository;
