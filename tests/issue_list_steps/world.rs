//! Shared world state for issue list BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use todobot::issue::{
    adapters::memory::{InMemoryIdentityDirectory, InMemoryIssueRepository},
    domain::{Issue, UserId},
    ports::IdentityResolver,
    services::{IssueListError, IssueListService},
};

/// Service type used by the BDD world.
pub type TestIssueService =
    IssueListService<InMemoryIssueRepository, InMemoryIdentityDirectory, DefaultClock>;

/// Scenario world for issue list behaviour tests.
pub struct ListWorld {
    pub service: TestIssueService,
    pub directory: Arc<InMemoryIdentityDirectory>,
    pub last_pop: Option<Result<Issue, IssueListError>>,
}

impl ListWorld {
    /// Creates a world with an empty store and directory.
    #[must_use]
    pub fn new() -> Self {
        let directory = Arc::new(InMemoryIdentityDirectory::new());
        let service = IssueListService::new(
            Arc::new(InMemoryIssueRepository::new()),
            Arc::clone(&directory),
            Arc::new(DefaultClock),
        );
        Self {
            service,
            directory,
            last_pop: None,
        }
    }

    /// Resolves a registered username to its identifier.
    pub fn user(&self, username: &str) -> Result<UserId, eyre::Report> {
        run_async(self.directory.resolve(username))?
            .ok_or_else(|| eyre::eyre!("user {username} is not registered in the scenario"))
    }
}

impl Default for ListWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ListWorld {
    ListWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
