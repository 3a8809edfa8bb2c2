//! Startup pipeline.
//!
//! Turns the `[[entities]]` configuration into entity descriptors, runs the
//! shard registration pass against the catalog and registry, persists the
//! shard history and renders the registry dump.

use anyhow::Result;
use chrono::NaiveDate;
use log::{debug, info};
use shardtab_commons::NamespaceId;
use shardtab_configs::{EntityConfig, ServerConfig, ShardingSettings};
use shardtab_registry::{
    EntityCatalog, EntityRegistration, InitPass, InitReport, RegistrySnapshot, ShardHistory,
    ShardTableRegistry,
};
use shardtab_sharding::{Clock, EntityDescriptor, FixedClock, SystemClock};
use std::sync::Arc;
use std::time::Instant;

/// Components produced by a successful startup.
pub struct ApplicationComponents {
    pub namespace: NamespaceId,
    pub catalog: Arc<EntityCatalog>,
    pub registry: Arc<ShardTableRegistry>,
    pub report: InitReport,
}

/// Build the abstract entity described by one `[[entities]]` entry.
pub fn entity_descriptor(config: &EntityConfig) -> Result<EntityDescriptor> {
    let mut builder = EntityDescriptor::builder(config.label.as_str(), config.table_prefix.as_str())
        .fields(config.fields.iter().cloned());
    if let Some(sharding) = &config.sharding {
        builder = builder.sharding(sharding.clone());
    }

    builder
        .build()
        .map_err(|e| anyhow::anyhow!("Invalid entity '{}': {}", config.label, e))
}

pub fn entity_registrations(config: &ServerConfig) -> Result<Vec<EntityRegistration>> {
    config
        .entities
        .iter()
        .map(|entity| {
            let descriptor = entity_descriptor(entity)?;
            Ok(EntityRegistration::new(Arc::new(descriptor), entity.admin.clone()))
        })
        .collect()
}

/// Clock pinned to `reference_date` when configured, system UTC date otherwise.
pub fn clock_for(settings: &ShardingSettings) -> Result<Box<dyn Clock>> {
    match settings.reference_date.as_deref().map(str::trim) {
        Some(raw) => {
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|e| anyhow::anyhow!("Invalid reference_date '{}': {}", raw, e))?;
            info!("Date-range shards resolved against pinned date {}", date);
            Ok(Box::new(FixedClock::new(date)))
        }
        None => Ok(Box::new(SystemClock)),
    }
}

/// Register every configured entity and return the populated components.
///
/// Any registration error aborts startup; the history file is only written
/// after the pass succeeded.
pub fn bootstrap(config: &ServerConfig) -> Result<ApplicationComponents> {
    let bootstrap_start = Instant::now();

    let phase_start = Instant::now();
    let namespace = NamespaceId::try_new(config.sharding.namespace.as_str())
        .map_err(|e| anyhow::anyhow!("Invalid sharding namespace: {}", e))?;
    let registrations = entity_registrations(config)?;
    let clock = clock_for(&config.sharding)?;
    info!(
        "Loaded {} entity descriptors ({:.2}ms)",
        registrations.len(),
        phase_start.elapsed().as_secs_f64() * 1000.0
    );

    let mut history = match &config.sharding.history_path {
        Some(path) => {
            let history = ShardHistory::load(path)?;
            debug!("Shard history loaded from {} ({} entities)", path, history.len());
            Some(history)
        }
        None => None,
    };

    let catalog = Arc::new(EntityCatalog::new());
    let registry = Arc::new(ShardTableRegistry::new());

    let report = {
        let span = tracing::info_span!(
            "shard_registration",
            namespace = %namespace,
            entities = registrations.len()
        );
        let _guard = span.enter();

        let mut pass = InitPass::new(&catalog, &registry, clock.as_ref()).namespace(namespace.clone());
        if let Some(history) = history.as_mut() {
            pass = pass.history(history);
        }
        pass.run(&registrations)?
    };

    if let (Some(history), Some(path)) = (&history, &config.sharding.history_path) {
        history.save(path)?;
        debug!("Shard history saved to {}", path);
    }

    info!(
        "Bootstrap complete: {} ({:.2}ms)",
        report,
        bootstrap_start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(ApplicationComponents {
        namespace,
        catalog,
        registry,
        report,
    })
}

/// Render the registry dump as readable text or pretty JSON.
pub fn render_dump(snapshot: &RegistrySnapshot, format: &str) -> Result<String> {
    match format {
        "json" => Ok(serde_json::to_string_pretty(snapshot)?),
        "text" => Ok(snapshot.to_string()),
        other => Err(anyhow::anyhow!("Unknown dump format '{}'", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shardtab_commons::{AdminOptions, FieldDefinition, FieldType};
    use shardtab_sharding::{EntitySchema, ShardingSpec};

    fn log_entity() -> EntityConfig {
        EntityConfig {
            label: "demo.log".to_string(),
            table_prefix: "log_".to_string(),
            fields: vec![FieldDefinition::simple("content", 0, FieldType::Text)],
            sharding: Some(ShardingSpec::date("2020-03-01", "%Y")),
            admin: AdminOptions::with_list_display(["id", "content"]),
        }
    }

    #[test]
    fn test_entity_descriptor_from_config() {
        let descriptor = entity_descriptor(&log_entity()).unwrap();
        assert_eq!(descriptor.label().as_str(), "demo.log");
        assert_eq!(descriptor.fields()[0].field_name, "id");
        assert_eq!(descriptor.sharding().unwrap().date_start.as_deref(), Some("2020-03-01"));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let mut entity = log_entity();
        entity.fields.push(FieldDefinition::simple("Content", 0, FieldType::Text));
        assert!(entity_descriptor(&entity).is_err());
    }

    #[test]
    fn test_clock_for_reference_date() {
        let settings = ShardingSettings {
            reference_date: Some("2022-07-04".to_string()),
            ..ShardingSettings::default()
        };
        let clock = clock_for(&settings).unwrap();
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2022, 7, 4).unwrap());
    }

    #[test]
    fn test_render_dump_formats() {
        let registry = ShardTableRegistry::new();
        let snapshot = registry.snapshot();
        assert!(render_dump(&snapshot, "text").is_ok());
        assert_eq!(render_dump(&snapshot, "json").unwrap(), "{}");
        assert!(render_dump(&snapshot, "yaml").is_err());
    }
}
