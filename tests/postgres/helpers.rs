//! Shared test helpers for `PostgreSQL` integration tests.

use std::sync::Arc;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use mockable::DefaultClock;
use rstest::fixture;
use todobot::issue::{
    adapters::{memory::InMemoryIdentityDirectory, postgres::PostgresIssueRepository},
    domain::UserId,
    services::IssueListService,
};
use uuid::Uuid;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Server URL used to create throwaway test databases.
pub const TEST_DATABASE_ENV: &str = "TODO_TEST_DATABASE_URL";

/// SQL to create the issue list schema.
pub const CREATE_TABLES_SQL: &str =
    include_str!("../../migrations/2026-10-18-000000_create_todo_lists/up.sql");

/// Pool size large enough for the concurrency tests.
const POOL_SIZE: u32 = 8;

/// Service type backed by the `PostgreSQL` repository.
pub type PgIssueService =
    IssueListService<PostgresIssueRepository, InMemoryIdentityDirectory, DefaultClock>;

/// Database created for one test and dropped with it.
pub struct TemporaryDatabase {
    admin_url: String,
    name: String,
    url: String,
}

impl TemporaryDatabase {
    /// Creates a database and applies the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the server is unreachable or the schema fails.
    pub fn create(admin_url: &str) -> Result<Self, BoxError> {
        let name = format!("todobot_test_{}", Uuid::new_v4().simple());
        let url = database_url(admin_url, &name)?;

        let mut admin = PgConnection::establish(admin_url)?;
        diesel::sql_query(format!("CREATE DATABASE {}", quote_identifier(&name)))
            .execute(&mut admin)?;
        let database = Self {
            admin_url: admin_url.to_owned(),
            name,
            url,
        };

        let mut connection = database.connect()?;
        connection.batch_execute(CREATE_TABLES_SQL)?;
        Ok(database)
    }

    /// Returns the URL of the temporary database.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Opens a dedicated connection outside the repository pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn connect(&self) -> Result<PgConnection, BoxError> {
        Ok(PgConnection::establish(&self.url)?)
    }
}

impl Drop for TemporaryDatabase {
    fn drop(&mut self) {
        if let Ok(mut admin) = PgConnection::establish(&self.admin_url) {
            let sql = format!(
                "DROP DATABASE IF EXISTS {} WITH (FORCE)",
                quote_identifier(&self.name)
            );
            drop(diesel::sql_query(sql).execute(&mut admin));
        }
    }
}

/// Repository, service, and database for one test.
pub struct PgContext {
    pub repository: Arc<PostgresIssueRepository>,
    pub service: PgIssueService,
    pub database: TemporaryDatabase,
}

impl PgContext {
    fn new(admin_url: &str) -> Result<Self, BoxError> {
        let database = TemporaryDatabase::create(admin_url)?;
        let repository = Arc::new(PostgresIssueRepository::connect(
            database.url(),
            POOL_SIZE,
        )?);
        let service = IssueListService::new(
            Arc::clone(&repository),
            Arc::new(InMemoryIdentityDirectory::new()),
            Arc::new(DefaultClock),
        );
        Ok(Self {
            repository,
            service,
            database,
        })
    }
}

/// Provides a fresh database, or `None` when no server is configured.
#[fixture]
pub fn pg_context() -> Option<PgContext> {
    let Ok(admin_url) = std::env::var(TEST_DATABASE_ENV) else {
        eprintln!("SKIP-TEST-CLUSTER: {TEST_DATABASE_ENV} is not set");
        return None;
    };
    Some(PgContext::new(&admin_url).expect("test database setup"))
}

/// Returns a user identifier for a test username.
#[must_use]
pub fn user_id(name: &str) -> UserId {
    UserId::new(format!("id-{name}")).expect("valid user id")
}

fn database_url(admin_url: &str, database: &str) -> Result<String, BoxError> {
    let (base, tail) = admin_url
        .rsplit_once('/')
        .ok_or("database URL has no path component")?;
    let query = tail
        .split_once('?')
        .map(|(_, query)| format!("?{query}"))
        .unwrap_or_default();
    Ok(format!("{base}/{database}{query}"))
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
