//! Errors - エラー型と分類
//!
//! ポート実装・設定読み込み・インスタンス検証で共通に使うエラー型。

use thiserror::Error;

use super::ids::BuildId;

/// ErrorKind は運用上の分類
///
/// - Transient: 一時的なエラー（次回の定期実行で自然に再試行される）
/// - Permanent: 恒久的なエラー（入力や設定を直さない限り再発する）
/// - Infrastructure: 外部サービス（registry / store / sink）の障害
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transient,
    Permanent,
    Infrastructure,
}

#[derive(Debug, Error)]
pub enum WatchdogError {
    #[error("instance registry {operation} failed: {message}")]
    Registry {
        operation: &'static str,
        message: String,
    },

    #[error("status store update for build {build_id} failed: {message}")]
    StatusStore { build_id: BuildId, message: String },

    #[error("notification publish failed: {0}")]
    Notification(String),

    #[error("invalid instance record: {0}")]
    InvalidInstance(String),

    #[error("invalid launch time {value:?}: {reason}")]
    InvalidLaunchTime { value: String, reason: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl WatchdogError {
    pub fn registry(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Registry {
            operation,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Registry { .. } | Self::StatusStore { .. } => ErrorKind::Infrastructure,
            Self::Notification(_) => ErrorKind::Transient,
            Self::InvalidInstance(_) | Self::InvalidLaunchTime { .. } | Self::Config(_) => {
                ErrorKind::Permanent
            }
        }
    }
}

impl From<figment::Error> for WatchdogError {
    fn from(err: figment::Error) -> Self {
        Self::Config(err.to_string())
    }
}
