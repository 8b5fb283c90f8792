//! Domain identifiers (strongly-typed string IDs).
//!
//! InstanceId と BuildId はどちらも外部システムが払い出す不透明な文字列。
//! 型を分けることで、ステータスストアのキーにインスタンス ID を渡すような
//! 取り違えをコンパイル時に防ぐ。

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a compute instance, as assigned by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(String);

impl InstanceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Correlation key between an instance and its build status record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildId(String);

impl BuildId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns `None` for the empty-string sentinel the registry uses for a
    /// missing tag value.
    pub fn from_tag_value(value: &str) -> Option<Self> {
        if value.is_empty() {
            None
        } else {
            Some(Self(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tag_value_is_not_a_build_id() {
        assert_eq!(BuildId::from_tag_value(""), None);
        assert_eq!(BuildId::from_tag_value("b-1"), Some(BuildId::new("b-1")));
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let s = serde_json::to_string(&InstanceId::new("i-0abc")).unwrap();
        assert_eq!(s, "\"i-0abc\"");

        let back: BuildId = serde_json::from_str("\"b-7\"").unwrap();
        assert_eq!(back.as_str(), "b-7");
    }
}
