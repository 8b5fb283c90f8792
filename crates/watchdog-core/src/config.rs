//! Config - 環境変数からの設定読み込み
//!
//! | 変数                 | 必須 | デフォルト |
//! |----------------------|------|------------|
//! | `MAX_LIFETIME_HOURS` | no   | 3          |
//! | `DYNAMODB_TABLE`     | yes  |            |
//! | `SNS_TOPIC_ARN`      | yes  |            |

use figment::{providers::Env, Figment};
use serde::{Deserialize, Serialize};

use crate::domain::WatchdogError;

/// Build pool whose instances the watchdog manages.
pub const POOL_NAME: &str = "labapp";

/// Estimated on-demand cost of one build instance hour, in USD.
pub const ESTIMATED_COST_PER_HOUR: f64 = 4.40;

pub const DEFAULT_MAX_LIFETIME_HOURS: u32 = 3;

const ENV_KEYS: [&str; 3] = ["MAX_LIFETIME_HOURS", "DYNAMODB_TABLE", "SNS_TOPIC_ARN"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchdogConfig {
    #[serde(default = "default_max_lifetime_hours")]
    pub max_lifetime_hours: u32,

    /// Status store table holding build records.
    #[serde(rename = "dynamodb_table")]
    pub status_table: String,

    /// Notification sink identifier.
    #[serde(rename = "sns_topic_arn")]
    pub notification_topic: String,

    #[serde(skip_deserializing, default = "default_pool_name")]
    pub pool_name: String,
}

fn default_max_lifetime_hours() -> u32 {
    DEFAULT_MAX_LIFETIME_HOURS
}

fn default_pool_name() -> String {
    POOL_NAME.to_string()
}

impl WatchdogConfig {
    pub fn new(status_table: impl Into<String>, notification_topic: impl Into<String>) -> Self {
        Self {
            max_lifetime_hours: DEFAULT_MAX_LIFETIME_HOURS,
            status_table: status_table.into(),
            notification_topic: notification_topic.into(),
            pool_name: default_pool_name(),
        }
    }

    pub fn with_max_lifetime_hours(mut self, hours: u32) -> Self {
        self.max_lifetime_hours = hours;
        self
    }

    pub fn from_env() -> Result<Self, WatchdogError> {
        Self::from_figment(Figment::new().merge(Env::raw().only(&ENV_KEYS)))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, WatchdogError> {
        let config: WatchdogConfig = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), WatchdogError> {
        if self.status_table.trim().is_empty() {
            return Err(WatchdogError::Config("DYNAMODB_TABLE must not be empty".to_string()));
        }
        if self.notification_topic.trim().is_empty() {
            return Err(WatchdogError::Config("SNS_TOPIC_ARN must not be empty".to_string()));
        }
        Ok(())
    }
}
