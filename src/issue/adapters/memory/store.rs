//! In-memory repository for issue lists.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::error;

use crate::issue::{
    domain::{Issue, IssueId, ListKind, SentIssue, SentRecord, UserId},
    ports::{IssueRepository, IssueRepositoryError, IssueRepositoryResult},
};

/// Thread-safe in-memory issue repository.
///
/// A single lock guards every user's lists, so a send touching two users and
/// a pop retiring a tracking record are each applied under one write guard.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIssueRepository {
    state: Arc<RwLock<InMemoryIssueState>>,
}

type ListKey = (UserId, ListKind);

#[derive(Debug, Default)]
struct InMemoryIssueState {
    issues: HashMap<IssueId, Issue>,
    sent_records: HashMap<IssueId, SentRecord>,
    lists: HashMap<ListKey, Vec<IssueId>>,
}

impl InMemoryIssueState {
    fn contains(&self, id: IssueId) -> bool {
        self.issues.contains_key(&id) || self.sent_records.contains_key(&id)
    }

    fn push(&mut self, user: &UserId, kind: ListKind, id: IssueId) {
        self.lists.entry((user.clone(), kind)).or_default().push(id);
    }

    fn head(&self, user: &UserId, kind: ListKind) -> Option<IssueId> {
        self.lists
            .get(&(user.clone(), kind))
            .and_then(|ids| ids.first().copied())
    }

    fn entries(&self, user: &UserId, kind: ListKind) -> &[IssueId] {
        self.lists
            .get(&(user.clone(), kind))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl InMemoryIssueRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> IssueRepositoryError {
    IssueRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

/// Removes an identifier from a list, cleaning up the entry if empty.
fn remove_from_list(lists: &mut HashMap<ListKey, Vec<IssueId>>, key: &ListKey, id: IssueId) {
    if let Some(ids) = lists.get_mut(key) {
        ids.retain(|entry| *entry != id);
        if ids.is_empty() {
            lists.remove(key);
        }
    }
}

fn dangling(user: &UserId, kind: ListKind, issue: IssueId) -> IssueRepositoryError {
    IssueRepositoryError::DanglingEntry {
        user: user.clone(),
        kind,
        issue,
    }
}

#[async_trait]
impl IssueRepository for InMemoryIssueRepository {
    async fn append(&self, owner: &UserId, issue: &Issue) -> IssueRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.contains(issue.id()) {
            return Err(IssueRepositoryError::DuplicateIssue(issue.id()));
        }

        state.issues.insert(issue.id(), issue.clone());
        state.push(owner, ListKind::My, issue.id());
        Ok(())
    }

    async fn append_sent(&self, sent: &SentIssue) -> IssueRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        for id in [sent.issue.id(), sent.record.id()] {
            if state.contains(id) {
                return Err(IssueRepositoryError::DuplicateIssue(id));
            }
        }

        let issue_id = sent.issue.id();
        let record_id = sent.record.id();
        state.issues.insert(issue_id, sent.issue.clone());
        state.sent_records.insert(record_id, sent.record.clone());
        state.push(sent.receiver(), ListKind::My, issue_id);
        state.push(sent.receiver(), ListKind::In, issue_id);
        state.push(sent.sender(), ListKind::Out, record_id);
        Ok(())
    }

    async fn pop_front(&self, owner: &UserId) -> IssueRepositoryResult<Option<Issue>> {
        let mut guard = self.state.write().map_err(lock_error)?;
        let state = &mut *guard;
        let my_key = (owner.clone(), ListKind::My);
        let in_key = (owner.clone(), ListKind::In);

        loop {
            let Some(head) = state.head(owner, ListKind::My) else {
                return Ok(None);
            };
            remove_from_list(&mut state.lists, &my_key, head);
            remove_from_list(&mut state.lists, &in_key, head);

            let Some(issue) = state.issues.remove(&head) else {
                error!(user = %owner, issue = %head, "dropped dangling list entry");
                continue;
            };

            if let Some(record_id) = issue.foreign_issue()
                && let Some(record) = state.sent_records.remove(&record_id)
            {
                let key = (record.sender().clone(), ListKind::Out);
                remove_from_list(&mut state.lists, &key, record_id);
            }

            return Ok(Some(issue));
        }
    }

    async fn list(&self, user: &UserId, kind: ListKind) -> IssueRepositoryResult<Vec<Issue>> {
        let state = self.state.read().map_err(lock_error)?;
        state
            .entries(user, kind)
            .iter()
            .map(|id| match kind {
                ListKind::My | ListKind::In => state
                    .issues
                    .get(id)
                    .cloned()
                    .ok_or_else(|| dangling(user, kind, *id)),
                ListKind::Out => {
                    let record = state
                        .sent_records
                        .get(id)
                        .ok_or_else(|| dangling(user, kind, *id))?;
                    let linked = state
                        .issues
                        .get(&record.issue_id())
                        .ok_or_else(|| dangling(user, kind, record.issue_id()))?;
                    Ok(Issue::outgoing_view(record, linked))
                }
            })
            .collect()
    }
}
