//! StatusStore port - build status の key-value ストア
//!
//! BuildID をキーにした単一レコードの更新のみ。スキャンはしない。

use async_trait::async_trait;

use crate::domain::{BuildId, BuildStatusUpdate, WatchdogError};

#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Sets the fields of `update` on the record keyed by `build_id`.
    async fn conditional_update(
        &self,
        build_id: &BuildId,
        update: &BuildStatusUpdate,
    ) -> Result<(), WatchdogError>;
}
