//! `PostgreSQL` adapters for issue list persistence.

mod models;
mod repository;
mod schema;

pub use repository::{IssuePgPool, LIST_OWNER_LOCK_SQL, PostgresIssueRepository};
