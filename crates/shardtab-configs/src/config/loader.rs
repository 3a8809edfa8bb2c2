use super::types::ServerConfig;
use crate::file_helpers::normalize_dir_path;
use chrono::NaiveDate;
use shardtab_commons::{EntityLabel, NamespaceId};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

impl ServerConfig {
    /// Load configuration from a TOML file
    ///
    /// Note: Environment overrides are applied separately via `apply_env_overrides()`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;

        Self::from_toml_str(&content)
    }

    /// Parse and finalize configuration from TOML text
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let mut config: ServerConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;

        config.finalize()?;

        Ok(config)
    }

    fn normalize_paths(&mut self) {
        self.logging.logs_path = normalize_dir_path(&self.logging.logs_path);
        if let Some(path) = self.sharding.history_path.as_mut() {
            *path = normalize_dir_path(path);
        }
    }

    /// Normalize local filesystem paths and validate configuration.
    ///
    /// Call this after applying environment overrides.
    pub fn finalize(&mut self) -> anyhow::Result<()> {
        self.normalize_paths();

        self.validate()?;

        Ok(())
    }

    /// Validate configuration settings
    pub fn validate(&self) -> anyhow::Result<()> {
        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            ));
        }

        let valid_formats = ["compact", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_formats.join(", ")
            ));
        }

        for (target, level) in &self.logging.targets {
            if !valid_levels.contains(&level.as_str()) {
                return Err(anyhow::anyhow!(
                    "Invalid log level '{}' for target '{}'. Must be one of: {}",
                    level,
                    target,
                    valid_levels.join(", ")
                ));
            }
        }

        NamespaceId::try_new(self.sharding.namespace.as_str())
            .map_err(|e| anyhow::anyhow!("Invalid sharding namespace: {}", e))?;

        if let Some(date) = &self.sharding.reference_date {
            NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|e| {
                anyhow::anyhow!("Invalid reference_date '{}' (expected YYYY-MM-DD): {}", date, e)
            })?;
        }

        let valid_dump_formats = ["text", "json"];
        if !valid_dump_formats.contains(&self.sharding.dump_format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid dump_format '{}'. Must be one of: {}",
                self.sharding.dump_format,
                valid_dump_formats.join(", ")
            ));
        }

        let mut labels = HashSet::new();
        for entity in &self.entities {
            let label = EntityLabel::try_new(entity.label.as_str())
                .map_err(|e| anyhow::anyhow!("Invalid entity label '{}': {}", entity.label, e))?;

            if entity.table_prefix.trim().is_empty() {
                return Err(anyhow::anyhow!("Entity '{}' has an empty table_prefix", label));
            }

            if !labels.insert(label.clone()) {
                return Err(anyhow::anyhow!("Entity '{}' is declared more than once", label));
            }
        }

        Ok(())
    }
}
