//! `PostgreSQL` repository implementation for issue list storage.
//!
//! Each port method runs in one database transaction. Appends first take a
//! transaction-scoped advisory lock per list owner, so list positions are
//! drawn in commit order and a later write never sorts ahead of an entry a
//! reader has already seen. Pops lock the head entry with
//! `FOR UPDATE SKIP LOCKED` so concurrent pops of the same list take distinct
//! issues; reads run in a read-only repeatable-read transaction so a list
//! never mixes entries from before and after a write.

use super::{
    models::{IssueRow, NewListEntryRow, SentRecordRow},
    schema::{todo_issues, todo_list_entries, todo_sent_records},
};
use crate::issue::{
    domain::{
        Issue, IssueId, IssueMessage, ListKind, PersistedIssueData, PostId, SentIssue,
        SentRecord, UserId,
    },
    ports::{IssueRepository, IssueRepositoryError, IssueRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::Text;
use std::collections::HashMap;
use tracing::{debug, error};
use uuid::Uuid;

/// Advisory lock taken for each list owner before appending.
///
/// The two-key form keeps these locks apart from other advisory lock users
/// of the same database.
pub const LIST_OWNER_LOCK_SQL: &str =
    "SELECT pg_advisory_xact_lock(hashtext('todo_list_entries'), hashtext($1))";

/// `PostgreSQL` connection pool type used by issue adapters.
pub type IssuePgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed issue repository.
#[derive(Debug, Clone)]
pub struct PostgresIssueRepository {
    pool: IssuePgPool,
}

impl From<DieselError> for IssueRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

impl PostgresIssueRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: IssuePgPool) -> Self {
        Self { pool }
    }

    /// Builds a connection pool for the given database URL.
    ///
    /// # Errors
    ///
    /// Returns [`IssueRepositoryError::Persistence`] when the pool cannot
    /// establish its initial connections.
    pub fn connect(database_url: &str, pool_size: u32) -> IssueRepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(IssueRepositoryError::persistence)?;
        Ok(Self::new(pool))
    }

    async fn run_blocking<F, T>(&self, f: F) -> IssueRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> IssueRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(IssueRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(IssueRepositoryError::persistence)?
    }
}

#[async_trait]
impl IssueRepository for PostgresIssueRepository {
    async fn append(&self, owner: &UserId, issue: &Issue) -> IssueRepositoryResult<()> {
        let issue_id = issue.id();
        let row = to_issue_row(owner, issue);
        let entry = list_entry(owner, ListKind::My, issue_id);

        self.run_blocking(move |connection| {
            connection.transaction::<_, IssueRepositoryError, _>(|connection| {
                lock_list_owners(connection, &[row.owner_id.as_str()])?;
                insert_issue(connection, &row, issue_id)?;
                insert_entries(connection, &[entry])
            })
        })
        .await
    }

    async fn append_sent(&self, sent: &SentIssue) -> IssueRepositoryResult<()> {
        let issue_id = sent.issue.id();
        let record_id = sent.record.id();
        let issue_row = to_issue_row(sent.receiver(), &sent.issue);
        let record_row = to_sent_record_row(&sent.record);
        let entries = [
            list_entry(sent.receiver(), ListKind::My, issue_id),
            list_entry(sent.receiver(), ListKind::In, issue_id),
            list_entry(sent.sender(), ListKind::Out, record_id),
        ];

        self.run_blocking(move |connection| {
            connection.transaction::<_, IssueRepositoryError, _>(|connection| {
                lock_list_owners(
                    connection,
                    &[record_row.receiver_id.as_str(), record_row.sender_id.as_str()],
                )?;
                insert_issue(connection, &issue_row, issue_id)?;
                diesel::insert_into(todo_sent_records::table)
                    .values(&record_row)
                    .execute(connection)
                    .map_err(|err| map_insert_error(err, record_id))?;
                insert_entries(connection, &entries)
            })
        })
        .await
    }

    async fn pop_front(&self, owner: &UserId) -> IssueRepositoryResult<Option<Issue>> {
        let owner = owner.clone();
        self.run_blocking(move |connection| {
            connection.transaction::<_, IssueRepositoryError, _>(|connection| {
                loop {
                    let Some(head) = lock_head(connection, &owner)? else {
                        return Ok(None);
                    };

                    diesel::delete(
                        todo_list_entries::table.filter(todo_list_entries::entry_id.eq(head)),
                    )
                    .execute(connection)?;

                    let Some(row) = todo_issues::table
                        .find(head)
                        .select(IssueRow::as_select())
                        .first::<IssueRow>(connection)
                        .optional()?
                    else {
                        error!(user = %owner, issue = %head, "dropped dangling list entry");
                        continue;
                    };

                    if let Some(record_id) = row.foreign_issue_id {
                        diesel::delete(
                            todo_list_entries::table
                                .filter(todo_list_entries::entry_id.eq(record_id)),
                        )
                        .execute(connection)?;
                        diesel::delete(todo_sent_records::table.find(record_id))
                            .execute(connection)?;
                    }
                    diesel::delete(todo_issues::table.find(head)).execute(connection)?;

                    debug!(user = %owner, issue = %head, "popped issue row");
                    return row_to_issue(row).map(Some);
                }
            })
        })
        .await
    }

    async fn list(&self, user: &UserId, kind: ListKind) -> IssueRepositoryResult<Vec<Issue>> {
        let user = user.clone();
        self.run_blocking(move |connection| {
            connection
                .build_transaction()
                .repeatable_read()
                .read_only()
                .run::<_, IssueRepositoryError, _>(|connection| {
                    let entry_ids = todo_list_entries::table
                        .filter(todo_list_entries::user_id.eq(user.as_str()))
                        .filter(todo_list_entries::list_kind.eq(kind.as_str()))
                        .order(todo_list_entries::position.asc())
                        .select(todo_list_entries::entry_id)
                        .load::<Uuid>(connection)?;

                    match kind {
                        ListKind::My | ListKind::In => {
                            load_issues(connection, &user, kind, &entry_ids)
                        }
                        ListKind::Out => load_outgoing(connection, &user, &entry_ids),
                    }
                })
        })
        .await
    }
}

/// Serializes appends per list owner until the transaction ends.
///
/// Owners are locked in sorted order so two sends between the same pair of
/// users cannot deadlock.
fn lock_list_owners(connection: &mut PgConnection, owners: &[&str]) -> IssueRepositoryResult<()> {
    let mut owners = owners.to_vec();
    owners.sort_unstable();
    owners.dedup();
    for owner in owners {
        diesel::sql_query(LIST_OWNER_LOCK_SQL)
            .bind::<Text, _>(owner)
            .execute(connection)?;
    }
    Ok(())
}

fn lock_head(connection: &mut PgConnection, owner: &UserId) -> IssueRepositoryResult<Option<Uuid>> {
    let head = todo_list_entries::table
        .filter(todo_list_entries::user_id.eq(owner.as_str()))
        .filter(todo_list_entries::list_kind.eq(ListKind::My.as_str()))
        .order(todo_list_entries::position.asc())
        .select(todo_list_entries::entry_id)
        .for_update()
        .skip_locked()
        .first::<Uuid>(connection)
        .optional()?;
    Ok(head)
}

fn insert_issue(
    connection: &mut PgConnection,
    row: &IssueRow,
    issue_id: IssueId,
) -> IssueRepositoryResult<()> {
    diesel::insert_into(todo_issues::table)
        .values(row)
        .execute(connection)
        .map_err(|err| map_insert_error(err, issue_id))?;
    Ok(())
}

fn insert_entries(
    connection: &mut PgConnection,
    entries: &[NewListEntryRow],
) -> IssueRepositoryResult<()> {
    diesel::insert_into(todo_list_entries::table)
        .values(entries)
        .execute(connection)?;
    Ok(())
}

fn map_insert_error(err: DieselError, id: IssueId) -> IssueRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            IssueRepositoryError::DuplicateIssue(id)
        }
        other => IssueRepositoryError::persistence(other),
    }
}

fn load_issues(
    connection: &mut PgConnection,
    user: &UserId,
    kind: ListKind,
    entry_ids: &[Uuid],
) -> IssueRepositoryResult<Vec<Issue>> {
    let mut rows: HashMap<Uuid, IssueRow> = todo_issues::table
        .filter(todo_issues::id.eq_any(entry_ids))
        .select(IssueRow::as_select())
        .load::<IssueRow>(connection)?
        .into_iter()
        .map(|row| (row.id, row))
        .collect();

    entry_ids
        .iter()
        .map(|id| {
            let row = rows
                .remove(id)
                .ok_or_else(|| IssueRepositoryError::DanglingEntry {
                    user: user.clone(),
                    kind,
                    issue: IssueId::from_uuid(*id),
                })?;
            row_to_issue(row)
        })
        .collect()
}

fn load_outgoing(
    connection: &mut PgConnection,
    user: &UserId,
    entry_ids: &[Uuid],
) -> IssueRepositoryResult<Vec<Issue>> {
    let records = todo_sent_records::table
        .filter(todo_sent_records::id.eq_any(entry_ids))
        .select(SentRecordRow::as_select())
        .load::<SentRecordRow>(connection)?;
    let linked_ids: Vec<Uuid> = records.iter().map(|record| record.issue_id).collect();
    let mut records: HashMap<Uuid, SentRecordRow> = records
        .into_iter()
        .map(|record| (record.id, record))
        .collect();
    let linked: HashMap<Uuid, IssueRow> = todo_issues::table
        .filter(todo_issues::id.eq_any(&linked_ids))
        .select(IssueRow::as_select())
        .load::<IssueRow>(connection)?
        .into_iter()
        .map(|row| (row.id, row))
        .collect();

    let dangling = |id: Uuid| IssueRepositoryError::DanglingEntry {
        user: user.clone(),
        kind: ListKind::Out,
        issue: IssueId::from_uuid(id),
    };

    entry_ids
        .iter()
        .map(|id| {
            let record_row = records.remove(id).ok_or_else(|| dangling(*id))?;
            let linked_row = linked
                .get(&record_row.issue_id)
                .cloned()
                .ok_or_else(|| dangling(record_row.issue_id))?;
            let record = row_to_sent_record(record_row)?;
            let issue = row_to_issue(linked_row)?;
            Ok(Issue::outgoing_view(&record, &issue))
        })
        .collect()
}

fn list_entry(user: &UserId, kind: ListKind, id: IssueId) -> NewListEntryRow {
    NewListEntryRow {
        user_id: user.as_str().to_owned(),
        list_kind: kind.as_str().to_owned(),
        entry_id: id.into_inner(),
    }
}

fn to_issue_row(owner: &UserId, issue: &Issue) -> IssueRow {
    IssueRow {
        id: issue.id().into_inner(),
        owner_id: owner.as_str().to_owned(),
        message: issue.message().as_str().to_owned(),
        post_id: issue.post_id().map(|post| post.as_str().to_owned()),
        foreign_user_id: issue.foreign_user().map(|user| user.as_str().to_owned()),
        foreign_issue_id: issue.foreign_issue().map(IssueId::into_inner),
        created_at: issue.created_at(),
    }
}

fn to_sent_record_row(record: &SentRecord) -> SentRecordRow {
    SentRecordRow {
        id: record.id().into_inner(),
        sender_id: record.sender().as_str().to_owned(),
        receiver_id: record.receiver().as_str().to_owned(),
        issue_id: record.issue_id().into_inner(),
        created_at: record.created_at(),
    }
}

fn row_to_issue(row: IssueRow) -> IssueRepositoryResult<Issue> {
    let IssueRow {
        id,
        message,
        post_id,
        foreign_user_id,
        foreign_issue_id,
        created_at,
        ..
    } = row;

    let message = IssueMessage::new(message).map_err(IssueRepositoryError::persistence)?;
    let post_id = post_id
        .map(PostId::new)
        .transpose()
        .map_err(IssueRepositoryError::persistence)?;
    let foreign_user = foreign_user_id
        .map(UserId::new)
        .transpose()
        .map_err(IssueRepositoryError::persistence)?;

    Ok(Issue::from_persisted(PersistedIssueData {
        id: IssueId::from_uuid(id),
        message,
        created_at,
        post_id,
        foreign_user,
        foreign_issue: foreign_issue_id.map(IssueId::from_uuid),
    }))
}

fn row_to_sent_record(row: SentRecordRow) -> IssueRepositoryResult<SentRecord> {
    let sender = UserId::new(row.sender_id).map_err(IssueRepositoryError::persistence)?;
    let receiver = UserId::new(row.receiver_id).map_err(IssueRepositoryError::persistence)?;
    Ok(SentRecord::from_persisted(
        IssueId::from_uuid(row.id),
        sender,
        receiver,
        IssueId::from_uuid(row.issue_id),
        row.created_at,
    ))
}
