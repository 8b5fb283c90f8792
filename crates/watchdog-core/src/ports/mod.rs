//! Ports - 抽象化レイヤー
//!
//! Hexagonal Architecture の「ポート」。watchdog が呼び出す外部サービス
//! （compute registry, status store, notification sink）と時刻を trait で表し、
//! Reaper にはコンストラクタで注入する。テストでは impls の InMemory 実装に
//! 差し替える。
//!
//! タイムアウトやリトライは各クライアント実装のデフォルトに任せる。

pub mod clock;
pub mod instance_registry;
pub mod status_store;
pub mod notifier;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::instance_registry::{InstanceFilter, FilterClause, InstanceRegistry};
pub use self::status_store::StatusStore;
pub use self::notifier::Notifier;
