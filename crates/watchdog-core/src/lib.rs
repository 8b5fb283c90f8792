//! watchdog-core
//!
//! Lifetime watchdog for ephemeral build instances.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, instance, age, policy, status, outcome, errors）
//! - **ports**: 外部サービスの抽象化（InstanceRegistry, StatusStore, Notifier, Clock）
//! - **app**: アプリケーションロジック（locator, reaper, notification, report, builder）
//! - **impls**: InMemory 実装（テスト・ローカル実行用）
//! - **config**: 環境変数からの設定読み込み

pub mod domain;
pub mod ports;
pub mod app;
pub mod impls;
pub mod config;

pub use self::app::{handle_event, Reaper, ReaperBuilder, Response, RunReport};
pub use self::config::WatchdogConfig;
pub use self::domain::WatchdogError;
