//! App - アプリケーション層
//!
//! ports を組み合わせて watchdog の 1 回分の実行を組み立てる。
//!
//! # 主要コンポーネント
//! - **InstanceLocator**: 候補インスタンスの検索
//! - **Reaper**: 判定 → terminate → status 更新 → 通知
//! - **TerminationNotice**: 通知メッセージの整形
//! - **Report**: 集計とレスポンス整形
//! - **ReaperBuilder**: ワイヤリング

pub mod builder;
pub mod locator;
pub mod notification;
pub mod reaper;
pub mod report;

pub use self::builder::{BuildError, ReaperBuilder};
pub use self::locator::InstanceLocator;
pub use self::notification::TerminationNotice;
pub use self::reaper::Reaper;
pub use self::report::{InvocationResult, Response, RunReport};

/// Entry point for the scheduled trigger.
///
/// The event envelope carries nothing the watchdog needs and is ignored.
pub async fn handle_event(reaper: &Reaper, _event: &serde_json::Value) -> Response {
    reaper.run().await.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::WatchdogConfig;
    use crate::impls::{InMemoryRegistry, InMemoryStatusStore, RecordingNotifier};

    #[tokio::test]
    async fn scheduled_event_payload_is_ignored() {
        let reaper = ReaperBuilder::new(WatchdogConfig::new("t", "topic"))
            .registry(Arc::new(InMemoryRegistry::default()))
            .status_store(Arc::new(InMemoryStatusStore::new()))
            .notifier(Arc::new(RecordingNotifier::new()))
            .build()
            .unwrap();

        let event = serde_json::json!({
            "source": "aws.events",
            "detail-type": "Scheduled Event",
            "detail": {},
        });
        let response = handle_event(&reaper, &event).await;

        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, r#"{"checked":0,"terminated":0,"errors":[]}"#);
    }
}
