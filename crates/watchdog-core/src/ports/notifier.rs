//! Notifier port - operator 向け通知（SNS topic など）

use async_trait::async_trait;

use crate::domain::WatchdogError;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn publish(&self, subject: &str, body: &str) -> Result<(), WatchdogError>;
}
