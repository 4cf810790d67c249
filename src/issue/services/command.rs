//! `/todo` command parsing and dispatch.
//!
//! The command layer turns chat input into issue list operations, tells the
//! other party of a send or pop through the [`Notifier`], and returns a
//! structured outcome. Turning outcomes into chat text is left to the host.

use std::sync::Arc;

use mockable::Clock;
use thiserror::Error;
use tracing::{debug, error, warn};

use super::list_manager::{ErrorKind, IssueListError, IssueListService};
use super::notifications::{self, NotificationRenderError};
use crate::issue::{
    domain::{Issue, IssueId, ListKind, ParseListKindError, PostId, UserId},
    ports::{IdentityError, IdentityResolver, IssueRepository, Notifier},
};

/// Slash-command trigger handled by [`CommandService`].
pub const TRIGGER: &str = "/todo";

/// Usage text shown for `help` and unrecognized input.
pub const HELP_TEXT: &str = "Available Commands:

add [message]
\tAdds a Todo.

\texample: /todo add Don't forget to be awesome

list
\tLists your Todo issues.

list [listName]
\tList your issues in certain list

\texample: /todo list in
\texample: /todo list out
\texample (same as /todo list): /todo list my

pop
\tRemoves the Todo issue at the top of the list.

send [user] [message]
\tSends some user a Todo

\texample: /todo send @awesomePerson Don't forget to be awesome

help
\tDisplay usage.
";

/// Appended to user errors that a look at the usage text would fix.
pub const HELP_HINT: &str = "Run `/todo help` for usage instructions.";

/// Shown to the user in place of system error details.
pub const GENERIC_FAILURE: &str =
    "An unknown error occurred. Please talk to your system administrator for help.";

/// A parsed `/todo` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoCommand {
    /// Add an issue to the caller's own list.
    Add {
        /// Issue text; may be empty, which execution rejects.
        message: String,
    },
    /// Show one of the caller's lists.
    List {
        /// Requested list.
        kind: ListKind,
    },
    /// Remove the oldest issue from the caller's list.
    Pop,
    /// Send an issue to another user.
    Send {
        /// Target username, without a leading `@`.
        username: String,
        /// Issue text.
        message: String,
    },
    /// Show usage.
    Help,
}

impl TodoCommand {
    /// Parses `/todo <subcommand> ...` input.
    ///
    /// The trigger is optional. Bare input lists the `my` list, and an
    /// unrecognized subcommand yields [`TodoCommand::Help`]. Message words
    /// are joined with single spaces.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::UnknownList`] for `list` with an unknown list
    /// name, or [`CommandError::MissingSendArguments`] for `send` without
    /// both a user and a message.
    pub fn parse(raw_input: &str) -> Result<Self, CommandError> {
        let mut tokens = raw_input.split_whitespace().peekable();
        tokens.next_if_eq(&TRIGGER);

        let Some(subcommand) = tokens.next() else {
            return Ok(Self::List {
                kind: ListKind::My,
            });
        };
        let rest: Vec<&str> = tokens.collect();

        match subcommand {
            "add" => Ok(Self::Add {
                message: rest.join(" "),
            }),
            "list" => {
                let kind = rest
                    .first()
                    .map_or(Ok(ListKind::My), |name| ListKind::try_from(*name))?;
                Ok(Self::List { kind })
            }
            "pop" => Ok(Self::Pop),
            "send" => {
                let Some((&target, words)) = rest.split_first() else {
                    return Err(CommandError::MissingSendArguments);
                };
                if words.is_empty() {
                    return Err(CommandError::MissingSendArguments);
                }
                let username = target.strip_prefix('@').unwrap_or(target);
                Ok(Self::Send {
                    username: username.to_owned(),
                    message: words.join(" "),
                })
            }
            _ => Ok(Self::Help),
        }
    }
}

/// Result of a successfully executed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// An issue was added to the caller's list.
    Added {
        /// The stored issue.
        issue: Issue,
        /// The caller's `my` list after the add, if it could be loaded.
        list: Option<Vec<Issue>>,
    },
    /// A list was fetched.
    Listed {
        /// The list that was fetched.
        kind: ListKind,
        /// Its entries, oldest first.
        issues: Vec<Issue>,
    },
    /// The oldest issue was removed.
    Popped {
        /// The removed issue.
        issue: Issue,
        /// The caller's `my` list after the pop, if it could be loaded.
        list: Option<Vec<Issue>>,
    },
    /// An issue was sent to another user.
    Sent {
        /// Receiving user.
        receiver: UserId,
        /// Username the caller addressed.
        username: String,
        /// Issue in the receiver's queue.
        issue_id: IssueId,
    },
    /// Usage was requested.
    Help,
}

/// Errors for `/todo` command execution.
#[derive(Debug, Error)]
pub enum CommandError {
    /// `add` was given no message.
    #[error("Please add a task.")]
    MissingMessage,

    /// `send` was missing its user or message.
    #[error("You must specify a user and a message.")]
    MissingSendArguments,

    /// `list` named an unknown list.
    #[error(transparent)]
    UnknownList(#[from] ParseListKindError),

    /// The `send` target could not be resolved.
    #[error("Please, provide a valid user: {0}")]
    UnknownUser(String),

    /// The identity directory failed.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// An issue list operation failed.
    #[error(transparent)]
    Issue(#[from] IssueListError),
}

impl CommandError {
    /// Classifies the error for presentation.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingMessage
            | Self::MissingSendArguments
            | Self::UnknownList(_)
            | Self::UnknownUser(_) => ErrorKind::User,
            Self::Identity(_) => ErrorKind::System,
            Self::Issue(err) => err.kind(),
        }
    }

    /// Returns the text safe to show the acting user.
    ///
    /// Malformed commands point the user at [`HELP_HINT`]; system failures
    /// are replaced by [`GENERIC_FAILURE`].
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::MissingSendArguments | Self::UnknownList(_) | Self::UnknownUser(_) => {
                format!("{self}\n\n{HELP_HINT}")
            }
            Self::MissingMessage | Self::Identity(_) | Self::Issue(_) => match self.kind() {
                ErrorKind::User | ErrorKind::NotFound => self.to_string(),
                ErrorKind::System => GENERIC_FAILURE.to_owned(),
            },
        }
    }
}

/// Result type for command execution.
pub type CommandResult<T> = Result<T, CommandError>;

/// Executes `/todo` commands on behalf of a user.
pub struct CommandService<R, I, N, C>
where
    R: IssueRepository + ?Sized,
    I: IdentityResolver + ?Sized,
    N: Notifier + ?Sized,
    C: Clock + Send + Sync,
{
    issues: IssueListService<R, I, C>,
    identity: Arc<I>,
    notifier: Arc<N>,
}

impl<R, I, N, C> Clone for CommandService<R, I, N, C>
where
    R: IssueRepository + ?Sized,
    I: IdentityResolver + ?Sized,
    N: Notifier + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            issues: self.issues.clone(),
            identity: Arc::clone(&self.identity),
            notifier: Arc::clone(&self.notifier),
        }
    }
}

impl<R, I, N, C> CommandService<R, I, N, C>
where
    R: IssueRepository + ?Sized,
    I: IdentityResolver + ?Sized,
    N: Notifier + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new command service.
    #[must_use]
    pub const fn new(
        issues: IssueListService<R, I, C>,
        identity: Arc<I>,
        notifier: Arc<N>,
    ) -> Self {
        Self {
            issues,
            identity,
            notifier,
        }
    }

    /// Parses and executes raw `/todo` input for the acting user.
    ///
    /// System failures are logged here; user and not-found errors are only
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] when parsing, identity resolution, or the
    /// issue list operation fails. Notification failures never fail the
    /// command.
    pub async fn execute(&self, actor: &UserId, raw_input: &str) -> CommandResult<CommandOutcome> {
        let result = match TodoCommand::parse(raw_input) {
            Ok(command) => self.run(actor, command).await,
            Err(err) => Err(err),
        };

        if let Err(err) = &result {
            match err.kind() {
                ErrorKind::System => error!(user = %actor, error = %err, "todo command failed"),
                ErrorKind::User | ErrorKind::NotFound => {
                    debug!(user = %actor, error = %err, "todo command rejected");
                }
            }
        }
        result
    }

    /// Executes an already parsed command.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn run(&self, actor: &UserId, command: TodoCommand) -> CommandResult<CommandOutcome> {
        match command {
            TodoCommand::Add { message } => self.run_add(actor, &message).await,
            TodoCommand::List { kind } => self.run_list(actor, kind).await,
            TodoCommand::Pop => self.run_pop(actor).await,
            TodoCommand::Send { username, message } => {
                self.run_send(actor, username, &message).await
            }
            TodoCommand::Help => Ok(CommandOutcome::Help),
        }
    }

    async fn run_add(&self, actor: &UserId, message: &str) -> CommandResult<CommandOutcome> {
        if message.trim().is_empty() {
            return Err(CommandError::MissingMessage);
        }
        let issue = self.issues.add_issue(actor, message, None).await?;
        self.refresh(actor).await;
        let list = self.current_list(actor).await;
        Ok(CommandOutcome::Added { issue, list })
    }

    async fn run_list(&self, actor: &UserId, kind: ListKind) -> CommandResult<CommandOutcome> {
        let issues = self.issues.issue_list(actor, kind).await?;
        self.refresh(actor).await;
        Ok(CommandOutcome::Listed { kind, issues })
    }

    async fn run_pop(&self, actor: &UserId) -> CommandResult<CommandOutcome> {
        let issue = self.issues.pop_issue(actor).await?;
        let popper = self.issues.user_name(actor).await;
        let message = issue.message().as_str();

        if let Some(sender) = issue.foreign_user() {
            self.refresh(sender).await;
            self.notify(sender, notifications::popped_sent(&popper, message))
                .await;
        }
        self.refresh(actor).await;
        if let Some(post) = issue.post_id() {
            self.reply(post, notifications::popped_thread(&popper, message))
                .await;
        }

        let list = self.current_list(actor).await;
        Ok(CommandOutcome::Popped { issue, list })
    }

    async fn run_send(
        &self,
        actor: &UserId,
        username: String,
        message: &str,
    ) -> CommandResult<CommandOutcome> {
        let receiver = self
            .identity
            .resolve(&username)
            .await?
            .ok_or_else(|| CommandError::UnknownUser(username.clone()))?;

        if &receiver == actor {
            return self.run_add(actor, message).await;
        }

        let issue_id = self
            .issues
            .send_issue(actor, &receiver, message, None)
            .await?;
        self.refresh(actor).await;
        self.refresh(&receiver).await;

        let sender_name = self.issues.user_name(actor).await;
        self.notify(&receiver, notifications::received(&sender_name, message))
            .await;

        Ok(CommandOutcome::Sent {
            receiver,
            username,
            issue_id,
        })
    }

    async fn current_list(&self, actor: &UserId) -> Option<Vec<Issue>> {
        match self.issues.issue_list(actor, ListKind::My).await {
            Ok(issues) => Some(issues),
            Err(err) => {
                error!(user = %actor, error = %err, "failed to reload list after update");
                None
            }
        }
    }

    async fn notify(&self, recipient: &UserId, text: Result<String, NotificationRenderError>) {
        let delivery = match text {
            Ok(text) => self.notifier.notify(recipient, &text).await,
            Err(err) => {
                warn!(user = %recipient, error = %err, "skipping notification");
                return;
            }
        };
        if let Err(err) = delivery {
            warn!(user = %recipient, error = %err, "failed to deliver notification");
        }
    }

    async fn reply(&self, post: &PostId, text: Result<String, NotificationRenderError>) {
        let delivery = match text {
            Ok(text) => self.notifier.reply(post, &text).await,
            Err(err) => {
                warn!(post = %post, error = %err, "skipping thread reply");
                return;
            }
        };
        if let Err(err) = delivery {
            warn!(post = %post, error = %err, "failed to post thread reply");
        }
    }

    async fn refresh(&self, user: &UserId) {
        if let Err(err) = self.notifier.refresh(user).await {
            warn!(user = %user, error = %err, "failed to send refresh event");
        }
    }
}
