//! ReaperBuilder - Reaper の構築とワイヤリング
//!
//! 外部サービスのクライアントはプロセス起動時に一度だけ作り、ここで注入する。

use std::sync::Arc;

use super::reaper::Reaper;
use crate::config::WatchdogConfig;
use crate::ports::{Clock, InstanceRegistry, Notifier, StatusStore, SystemClock};

/// ReaperBuilder は Reaper を構築
///
/// # 使用例
/// ```ignore
/// let reaper = ReaperBuilder::new(config)
///     .registry(registry)
///     .status_store(store)
///     .notifier(notifier)
///     .build()?;
/// ```
///
/// # Fail-fast 設計
/// - 必須のコラボレータが欠けていれば build() が BuildError を返す
/// - 設定の検証も build() 時に行う
/// - clock は省略時 SystemClock
pub struct ReaperBuilder {
    config: WatchdogConfig,
    registry: Option<Arc<dyn InstanceRegistry>>,
    status_store: Option<Arc<dyn StatusStore>>,
    notifier: Option<Arc<dyn Notifier>>,
    clock: Option<Arc<dyn Clock>>,
}

/// BuildError は Reaper 構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing collaborators: {0:?}. These must be provided before build().")]
    MissingCollaborators(Vec<&'static str>),

    #[error(transparent)]
    InvalidConfig(#[from] crate::domain::WatchdogError),
}

impl ReaperBuilder {
    pub fn new(config: WatchdogConfig) -> Self {
        Self {
            config,
            registry: None,
            status_store: None,
            notifier: None,
            clock: None,
        }
    }

    pub fn registry(mut self, registry: Arc<dyn InstanceRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn status_store(mut self, status_store: Arc<dyn StatusStore>) -> Self {
        self.status_store = Some(status_store);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Result<Reaper, BuildError> {
        self.config.validate()?;

        let mut missing = Vec::new();
        if self.registry.is_none() {
            missing.push("registry");
        }
        if self.status_store.is_none() {
            missing.push("status_store");
        }
        if self.notifier.is_none() {
            missing.push("notifier");
        }

        match (self.registry, self.status_store, self.notifier) {
            (Some(registry), Some(status_store), Some(notifier)) => Ok(Reaper::new(
                self.config,
                registry,
                status_store,
                notifier,
                self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            )),
            _ => Err(BuildError::MissingCollaborators(missing)),
        }
    }
}
