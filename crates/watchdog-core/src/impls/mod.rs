//! Impls - InMemory 実装
//!
//! テストとローカル実行（watchdog-cli）用。各実装は障害を注入できる。

pub mod inmem_registry;
pub mod inmem_status_store;
pub mod recording_notifier;

pub use self::inmem_registry::InMemoryRegistry;
pub use self::inmem_status_store::InMemoryStatusStore;
pub use self::recording_notifier::{PublishedMessage, RecordingNotifier};
