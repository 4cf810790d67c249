//! Notification texts sent to the other party of an issue.

use minijinja::{Environment, Value, context};
use thiserror::Error;

/// Direct message to the receiver of a sent issue.
pub const RECEIVED_TEMPLATE: &str = "You have received a new Todo from @{{ sender }}\n\n{{ message }}";

/// Direct message to the sender when a received issue is popped.
pub const POPPED_SENT_TEMPLATE: &str = "@{{ popper }} popped a Todo you sent: {{ message }}";

/// Thread reply when an issue that came from a post is popped.
pub const POPPED_THREAD_TEMPLATE: &str =
    "@{{ popper }} popped a todo attached to this thread\n\n{{ message }}";

/// Error returned when a notification template fails to render.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to render {template} notification: {reason}")]
pub struct NotificationRenderError {
    /// Name of the notification being rendered.
    pub template: &'static str,
    /// Rendering failure reason.
    pub reason: String,
}

/// Renders the receiver's notice for a newly sent issue.
///
/// # Errors
///
/// Returns [`NotificationRenderError`] when rendering fails.
pub fn received(sender: &str, message: &str) -> Result<String, NotificationRenderError> {
    render(
        "received",
        RECEIVED_TEMPLATE,
        context! { sender => sender, message => message },
    )
}

/// Renders the sender's notice for a popped issue.
///
/// # Errors
///
/// Returns [`NotificationRenderError`] when rendering fails.
pub fn popped_sent(popper: &str, message: &str) -> Result<String, NotificationRenderError> {
    render(
        "popped_sent",
        POPPED_SENT_TEMPLATE,
        context! { popper => popper, message => message },
    )
}

/// Renders the thread reply for a popped issue.
///
/// # Errors
///
/// Returns [`NotificationRenderError`] when rendering fails.
pub fn popped_thread(popper: &str, message: &str) -> Result<String, NotificationRenderError> {
    render(
        "popped_thread",
        POPPED_THREAD_TEMPLATE,
        context! { popper => popper, message => message },
    )
}

fn render(
    template: &'static str,
    source: &str,
    context: Value,
) -> Result<String, NotificationRenderError> {
    let environment = Environment::new();
    environment
        .render_str(source, context)
        .map_err(|error| NotificationRenderError {
            template,
            reason: error.to_string(),
        })
}
