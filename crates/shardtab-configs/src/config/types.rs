use super::defaults::*;
use serde::{Deserialize, Serialize};
use shardtab_commons::{AdminOptions, FieldDefinition};
use shardtab_sharding::ShardingSpec;
use std::collections::HashMap;

/// Main server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub sharding: ShardingSettings,
    /// Abstract entities registered at startup, in declaration order
    #[serde(default)]
    pub entities: Vec<EntityConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory for log files (default: "./logs")
    #[serde(default = "default_logs_path")]
    pub logs_path: String,
    #[serde(default = "default_true")]
    pub log_to_console: bool,
    /// "compact" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Optional per-target log level overrides:
    /// [logging.targets]
    /// shardtab_registry = "debug"
    #[serde(default)]
    pub targets: HashMap<String, String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            logs_path: default_logs_path(),
            log_to_console: default_true(),
            format: default_log_format(),
            targets: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShardingSettings {
    /// Namespace the concrete shard entities are registered under
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Pins "today" (YYYY-MM-DD) for date-range resolution; system UTC date when unset
    #[serde(default)]
    pub reference_date: Option<String>,
    /// JSON file recording materialized shard keys; history is disabled when unset
    #[serde(default)]
    pub history_path: Option<String>,
    /// Registry dump format printed at startup: "text" or "json"
    #[serde(default = "default_dump_format")]
    pub dump_format: String,
}

impl Default for ShardingSettings {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            reference_date: None,
            history_path: None,
            dump_format: default_dump_format(),
        }
    }
}

/// One abstract entity as declared in `[[entities]]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityConfig {
    /// Logical name, e.g. "demo.log"
    pub label: String,
    /// Prefix of every generated table, e.g. "log_"
    pub table_prefix: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    /// Policy fields, validated at registration; an entity without them
    /// fails registration as not shardable
    #[serde(default)]
    pub sharding: Option<ShardingSpec>,
    #[serde(default)]
    pub admin: AdminOptions,
}
