//! In-memory user directory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::issue::{
    domain::UserId,
    ports::{IdentityError, IdentityResolver, IdentityResult},
};

/// Thread-safe username directory for tests and single-process hosts.
///
/// A user may be registered under several usernames; all of them resolve,
/// and the most recent registration is the one used to mention the user.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

#[derive(Debug, Default)]
struct DirectoryState {
    by_username: HashMap<String, UserId>,
    display_names: HashMap<UserId, String>,
}

fn unavailable(err: impl std::fmt::Display) -> IdentityError {
    IdentityError::Unavailable(err.to_string())
}

impl InMemoryIdentityDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a username for the given user.
    ///
    /// Re-registering a username moves it to the new user.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Unavailable`] when the directory lock is
    /// poisoned.
    pub fn register(&self, username: impl Into<String>, user: UserId) -> IdentityResult<()> {
        let username = username.into();
        let mut state = self.state.write().map_err(unavailable)?;

        if let Some(previous) = state.by_username.insert(username.clone(), user.clone())
            && previous != user
            && state.display_names.get(&previous) == Some(&username)
        {
            state.display_names.remove(&previous);
        }
        state.display_names.insert(user, username);
        Ok(())
    }
}

#[async_trait]
impl IdentityResolver for InMemoryIdentityDirectory {
    async fn resolve(&self, username: &str) -> IdentityResult<Option<UserId>> {
        let state = self.state.read().map_err(unavailable)?;
        Ok(state.by_username.get(username).cloned())
    }

    async fn display_name(&self, user: &UserId) -> IdentityResult<String> {
        let state = self.state.read().map_err(unavailable)?;
        state
            .display_names
            .get(user)
            .cloned()
            .ok_or_else(|| IdentityError::UnknownUser(user.clone()))
    }
}
