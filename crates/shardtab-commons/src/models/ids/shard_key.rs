//! Shard key type for sharded table naming.
//!
//! A shard key is the per-shard suffix appended to an entity's table prefix:
//! `"user_" + "3"` gives the physical table `user_3`, `"log_" + "2021"` gives
//! `log_2021`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, string-renderable shard identifier.
///
/// Precise policies produce decimal keys (`"0"`, `"1"`, ...), date-range
/// policies produce formatted date buckets (`"2021"`, `"2021-03"`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShardKey(String);

impl ShardKey {
    /// Create a new ShardKey from any string-like value.
    #[inline]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Create the key of the `index`-th shard of a precise policy.
    #[inline]
    pub fn from_index(index: u32) -> Self {
        Self(index.to_string())
    }

    /// Returns the raw key.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Physical table name for this shard: `prefix + key`.
    #[inline]
    pub fn table_name_with_prefix(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.0)
    }
}

impl From<u32> for ShardKey {
    fn from(value: u32) -> Self {
        Self::from_index(value)
    }
}

impl From<&str> for ShardKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ShardKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ShardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shard_key_from_index() {
        assert_eq!(ShardKey::from_index(0).as_str(), "0");
        assert_eq!(ShardKey::from(42u32).to_string(), "42");
    }

    #[test]
    fn test_table_name_with_prefix() {
        assert_eq!(ShardKey::new("3").table_name_with_prefix("user_"), "user_3");
        assert_eq!(ShardKey::new("2021").table_name_with_prefix("log_"), "log_2021");
    }

    #[test]
    fn test_shard_key_serializes_as_plain_string() {
        let json = serde_json::to_string(&ShardKey::new("2020")).unwrap();
        assert_eq!(json, "\"2020\"");
    }
}
