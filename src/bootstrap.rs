//! Startup wiring for the issue store.
//!
//! Hosts build the repository once from [`StoreConfig`] and hand the shared
//! handle to every service instead of reaching for a global.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::config::{BackendKind, StoreConfig};
use crate::issue::{
    adapters::{memory::InMemoryIssueRepository, postgres::PostgresIssueRepository},
    ports::{IssueRepository, IssueRepositoryError},
};

/// Repository handle shared by all request handlers.
pub type SharedIssueRepository = Arc<dyn IssueRepository>;

/// Errors raised while opening the configured repository.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The `postgres` backend was selected without a database URL.
    #[error("no database URL configured for the postgres backend")]
    MissingDatabaseUrl,

    /// The backend could not be opened.
    #[error(transparent)]
    Repository(#[from] IssueRepositoryError),
}

/// Opens the repository selected by the configuration.
///
/// # Errors
///
/// Returns [`BootstrapError`] when the `postgres` backend lacks a URL or its
/// connection pool cannot be built.
pub fn open_repository(config: &StoreConfig) -> Result<SharedIssueRepository, BootstrapError> {
    let repository: SharedIssueRepository = match config.backend {
        BackendKind::Memory => Arc::new(InMemoryIssueRepository::new()),
        BackendKind::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or(BootstrapError::MissingDatabaseUrl)?;
            Arc::new(PostgresIssueRepository::connect(url, config.pool_size)?)
        }
    };
    info!(backend = %config.backend, "opened issue repository");
    Ok(repository)
}
