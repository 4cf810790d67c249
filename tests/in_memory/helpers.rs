//! Shared test helpers for in-memory integration tests.

use std::io;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use todobot::{
    bootstrap::{SharedIssueRepository, open_repository},
    config::StoreConfig,
    issue::{
        adapters::memory::{InMemoryIdentityDirectory, RecordingNotifier},
        domain::UserId,
        ports::IssueRepository,
        services::{CommandService, IssueListService},
    },
};
use tokio::runtime::Runtime;

/// Issue service over the boxed repository handle returned by bootstrap.
pub type SharedIssueService =
    IssueListService<dyn IssueRepository, InMemoryIdentityDirectory, DefaultClock>;

/// Command service wired to the recording notifier.
pub type SharedCommandService = CommandService<
    dyn IssueRepository,
    InMemoryIdentityDirectory,
    RecordingNotifier,
    DefaultClock,
>;

/// Provides a tokio runtime for async operations in tests.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
#[fixture]
pub fn runtime() -> io::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// Opens the default (in-memory) repository the way a host would.
#[fixture]
pub fn repository() -> SharedIssueRepository {
    open_repository(&StoreConfig::default()).expect("in-memory repository opens")
}

/// Provides a directory with `alice`, `bob`, and `carol` registered.
#[fixture]
pub fn directory() -> Arc<InMemoryIdentityDirectory> {
    let directory = InMemoryIdentityDirectory::new();
    for name in ["alice", "bob", "carol"] {
        directory
            .register(name, user_id(name))
            .expect("register test user");
    }
    Arc::new(directory)
}

/// Provides an issue service over a fresh repository.
#[fixture]
pub fn service(
    repository: SharedIssueRepository,
    directory: Arc<InMemoryIdentityDirectory>,
) -> SharedIssueService {
    IssueListService::new(repository, directory, Arc::new(DefaultClock))
}

/// Everything a command-level test needs to drive and observe `/todo`.
pub struct CommandFixture {
    /// Command entry point.
    pub commands: SharedCommandService,
    /// Service sharing the command layer's store.
    pub issues: SharedIssueService,
    /// Captured deliveries.
    pub notifier: RecordingNotifier,
}

/// Provides a command service with a recording notifier.
#[fixture]
pub fn command_fixture(
    service: SharedIssueService,
    directory: Arc<InMemoryIdentityDirectory>,
) -> CommandFixture {
    let notifier = RecordingNotifier::new();
    let commands = CommandService::new(service.clone(), directory, Arc::new(notifier.clone()));
    CommandFixture {
        commands,
        issues: service,
        notifier,
    }
}

/// Returns the user identifier registered for a test username.
#[must_use]
pub fn user_id(name: &str) -> UserId {
    UserId::new(format!("id-{name}")).expect("valid user id")
}
