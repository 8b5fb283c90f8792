//! Notifier that records what it publishes.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use crate::domain::WatchdogError;
use crate::ports::Notifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub subject: String,
    pub body: String,
}

#[derive(Default)]
struct NotifierState {
    published: Vec<PublishedMessage>,
    fail_with: Option<String>,
}

/// Records published messages and echoes them to the log.
#[derive(Default)]
pub struct RecordingNotifier {
    state: Mutex<NotifierState>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fail_with(&self, message: impl Into<String>) {
        self.state.lock().await.fail_with = Some(message.into());
    }

    pub async fn published(&self) -> Vec<PublishedMessage> {
        self.state.lock().await.published.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn publish(&self, subject: &str, body: &str) -> Result<(), WatchdogError> {
        let mut state = self.state.lock().await;
        if let Some(message) = &state.fail_with {
            return Err(WatchdogError::Notification(message.clone()));
        }
        info!(subject, "notification published");
        state.published.push(PublishedMessage {
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}
