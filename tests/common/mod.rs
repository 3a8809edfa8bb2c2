//! Shared fixtures for integration tests

#![allow(dead_code)]

use shardtab_server::config::ServerConfig;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Demo entities: `demo.user` (precise, 10) and `demo.log` (yearly since 2020-03-01).
pub const DEMO_ENTITIES: &str = r#"
[[entities]]
label = "demo.user"
table_prefix = "user_"

[entities.sharding]
type = "precise"
count = 10

[[entities.fields]]
field_name = "user_name"
field_type = { kind = "char", max_length = 50 }
is_unique = true

[[entities.fields]]
field_name = "age"
field_type = { kind = "integer" }
default_value = "18"

[entities.admin]
list_display = ["id", "user_name", "age"]

[[entities]]
label = "demo.log"
table_prefix = "log_"

[entities.sharding]
type = "date"
date_start = "2020-03-01"
date_format = "%Y"

[[entities.fields]]
field_name = "content"
field_type = { kind = "text" }

[entities.admin]
list_display = ["id", "time", "level", "content"]
"#;

/// Config file in a scratch directory, with logs and history kept inside it.
pub struct TestConfig {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl TestConfig {
    pub fn new(reference_date: &str, entities: &str) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let root = dir.path().display().to_string();
        let content = format!(
            r#"
[logging]
logs_path = "{root}/logs"
log_to_console = false

[sharding]
namespace = "apps.demo.models"
reference_date = "{reference_date}"
history_path = "{root}/data/shard_history.json"
{entities}"#
        );
        let path = dir.path().join("config.toml");
        fs::write(&path, content).expect("write config");
        Self { dir, path }
    }

    pub fn load(&self) -> ServerConfig {
        ServerConfig::from_file(&self.path).expect("load config")
    }

    pub fn history_path(&self) -> PathBuf {
        self.dir.path().join("data").join("shard_history.json")
    }
}
