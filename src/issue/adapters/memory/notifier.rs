//! Notifier that records deliveries instead of sending them.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::issue::{
    domain::{PostId, UserId},
    ports::{Notifier, NotifierError, NotifierResult},
};

/// A delivery captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Direct bot message.
    Direct {
        /// Recipient of the message.
        recipient: UserId,
        /// Message text.
        text: String,
    },
    /// Reply in an issue's originating thread.
    Reply {
        /// Thread the reply was posted to.
        post: PostId,
        /// Reply text.
        text: String,
    },
    /// Client refresh event.
    Refresh {
        /// User whose clients were asked to reload.
        user: UserId,
    },
}

/// Thread-safe notifier that keeps every delivery in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    deliveries: Arc<Mutex<Vec<Delivery>>>,
}

impl RecordingNotifier {
    /// Creates a notifier with no recorded deliveries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the deliveries recorded so far.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError`] when the recording lock is poisoned.
    pub fn deliveries(&self) -> NotifierResult<Vec<Delivery>> {
        let deliveries = self
            .deliveries
            .lock()
            .map_err(|err| NotifierError(err.to_string()))?;
        Ok(deliveries.clone())
    }

    fn record(&self, delivery: Delivery) -> NotifierResult<()> {
        self.deliveries
            .lock()
            .map_err(|err| NotifierError(err.to_string()))?
            .push(delivery);
        Ok(())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, recipient: &UserId, text: &str) -> NotifierResult<()> {
        self.record(Delivery::Direct {
            recipient: recipient.clone(),
            text: text.to_owned(),
        })
    }

    async fn reply(&self, post: &PostId, text: &str) -> NotifierResult<()> {
        self.record(Delivery::Reply {
            post: post.clone(),
            text: text.to_owned(),
        })
    }

    async fn refresh(&self, user: &UserId) -> NotifierResult<()> {
        self.record(Delivery::Refresh { user: user.clone() })
    }
}
