use super::types::ServerConfig;

impl ServerConfig {
    /// Apply `SHARDTAB_*` environment overrides on top of the file values.
    ///
    /// Call before `finalize()` so overridden values are validated too.
    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Same as [`apply_env_overrides`](Self::apply_env_overrides) with an
    /// explicit variable lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("SHARDTAB_LOG_LEVEL") {
            self.logging.level = level.to_lowercase();
        }

        if let Some(path) = lookup("SHARDTAB_LOGS_PATH") {
            self.logging.logs_path = path;
        }

        if let Some(val) = lookup("SHARDTAB_LOG_TO_CONSOLE") {
            self.logging.log_to_console = parse_bool("SHARDTAB_LOG_TO_CONSOLE", &val)?;
        }

        if let Some(format) = lookup("SHARDTAB_LOG_FORMAT") {
            self.logging.format = format.to_lowercase();
        }

        if let Some(namespace) = lookup("SHARDTAB_NAMESPACE") {
            self.sharding.namespace = namespace;
        }

        // Empty value clears a reference date set in the file
        if let Some(date) = lookup("SHARDTAB_REFERENCE_DATE") {
            self.sharding.reference_date = Some(date).filter(|d| !d.trim().is_empty());
        }

        if let Some(path) = lookup("SHARDTAB_HISTORY_PATH") {
            self.sharding.history_path = Some(path).filter(|p| !p.trim().is_empty());
        }

        Ok(())
    }
}

fn parse_bool(var: &str, value: &str) -> anyhow::Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(anyhow::anyhow!("Invalid {} value: {}", var, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn apply(vars: &[(&str, &str)]) -> anyhow::Result<ServerConfig> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        let mut config = ServerConfig::default();
        config.apply_overrides_from(|key| vars.get(key).cloned())?;
        Ok(config)
    }

    #[test]
    fn test_no_overrides_keeps_defaults() {
        let config = apply(&[]).unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.sharding.namespace, "default");
        assert!(config.sharding.reference_date.is_none());
    }

    #[test]
    fn test_overrides_applied() {
        let config = apply(&[
            ("SHARDTAB_LOG_LEVEL", "DEBUG"),
            ("SHARDTAB_LOG_TO_CONSOLE", "no"),
            ("SHARDTAB_LOG_FORMAT", "json"),
            ("SHARDTAB_NAMESPACE", "apps.demo.models"),
            ("SHARDTAB_REFERENCE_DATE", "2024-01-15"),
            ("SHARDTAB_HISTORY_PATH", "/tmp/history.json"),
        ])
        .unwrap();

        assert_eq!(config.logging.level, "debug");
        assert!(!config.logging.log_to_console);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.sharding.namespace, "apps.demo.models");
        assert_eq!(config.sharding.reference_date.as_deref(), Some("2024-01-15"));
        assert_eq!(config.sharding.history_path.as_deref(), Some("/tmp/history.json"));
    }

    #[test]
    fn test_empty_reference_date_clears() {
        let mut config = ServerConfig::default();
        config.sharding.reference_date = Some("2020-01-01".to_string());
        config
            .apply_overrides_from(|key| (key == "SHARDTAB_REFERENCE_DATE").then(String::new))
            .unwrap();
        assert!(config.sharding.reference_date.is_none());
    }

    #[test]
    fn test_invalid_bool() {
        assert!(apply(&[("SHARDTAB_LOG_TO_CONSOLE", "maybe")]).is_err());
    }
}
