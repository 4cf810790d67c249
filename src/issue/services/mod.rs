//! Application services for issue list orchestration.

mod command;
mod list_manager;
pub mod notifications;

pub use command::{
    CommandError, CommandOutcome, CommandResult, CommandService, GENERIC_FAILURE, HELP_HINT,
    HELP_TEXT, TRIGGER, TodoCommand,
};
pub use list_manager::{ErrorKind, IssueListError, IssueListResult, IssueListService};
