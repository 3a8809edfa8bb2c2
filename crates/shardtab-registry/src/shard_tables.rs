//! Label → shard tables registry.
//!
//! Holds, per logical entity, the ordered list of its generated tables and
//! the admin options registered for it. Admin tooling reads it through
//! [`ShardTableRegistry::snapshot`].

use dashmap::DashMap;
use serde::Serialize;
use shardtab_commons::{AdminOptions, EntityLabel, TableName};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Tables and admin options of one logical entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShardTableEntry {
    /// Generated tables in registration order, without duplicates
    pub tables: Vec<TableName>,

    /// Last options registered for the label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_opts: Option<AdminOptions>,

    #[serde(skip)]
    recorded: HashSet<TableName>,
}

impl ShardTableEntry {
    /// Append `table_name` unless already present; `true` when appended.
    fn push_unique(&mut self, table_name: &TableName) -> bool {
        if !self.recorded.insert(table_name.clone()) {
            return false;
        }
        self.tables.push(table_name.clone());
        true
    }
}

/// Process-wide label → (tables, admin options) mapping.
///
/// Filled by the startup registration pass and only read afterwards; the
/// `DashMap` backing makes concurrent reads from request handlers safe.
#[derive(Debug, Default)]
pub struct ShardTableRegistry {
    entries: DashMap<EntityLabel, ShardTableEntry>,
}

impl ShardTableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the admin options of `label`.
    pub fn register(&self, label: &EntityLabel, admin_opts: AdminOptions) {
        self.entries.entry(label.clone()).or_default().admin_opts = Some(admin_opts);
    }

    /// Append `table_name` to `label`'s shard list unless already present.
    ///
    /// Returns `true` when the table was appended.
    pub fn record_shard(&self, label: &EntityLabel, table_name: &TableName) -> bool {
        self.entries.entry(label.clone()).or_default().push_unique(table_name)
    }

    pub fn tables_for(&self, label: &EntityLabel) -> Option<Vec<TableName>> {
        self.entries.get(label).map(|entry| entry.tables.clone())
    }

    pub fn admin_opts(&self, label: &EntityLabel) -> Option<AdminOptions> {
        self.entries.get(label).and_then(|entry| entry.admin_opts.clone())
    }

    /// Registered labels, sorted.
    pub fn labels(&self) -> Vec<EntityLabel> {
        let mut labels: Vec<EntityLabel> = self.entries.iter().map(|e| e.key().clone()).collect();
        labels.sort();
        labels
    }

    /// Point-in-time copy of the whole registry, ordered by label.
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            entries: self
                .entries
                .iter()
                .map(|entry| (entry.key().clone(), entry.value().clone()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry. Only for an explicit, externally serialized re-init.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

/// Immutable copy of the registry for printing and serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RegistrySnapshot {
    entries: BTreeMap<EntityLabel, ShardTableEntry>,
}

impl RegistrySnapshot {
    pub fn get(&self, label: &EntityLabel) -> Option<&ShardTableEntry> {
        self.entries.get(label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntityLabel, &ShardTableEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn table_count(&self) -> usize {
        self.entries.values().map(|entry| entry.tables.len()).sum()
    }
}

impl fmt::Display for RegistrySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return writeln!(f, "(no sharded entities registered)");
        }
        for (label, entry) in &self.entries {
            let tables: Vec<&str> = entry.tables.iter().map(TableName::as_str).collect();
            writeln!(f, "{} ({} shards)", label, tables.len())?;
            writeln!(f, "  tables: [{}]", tables.join(", "))?;
            if let Some(opts) = &entry.admin_opts {
                writeln!(f, "  list_display: [{}]", opts.list_display.join(", "))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(s: &str) -> EntityLabel {
        EntityLabel::try_new(s).unwrap()
    }

    fn table(s: &str) -> TableName {
        TableName::try_new(s).unwrap()
    }

    #[test]
    fn test_record_shard_dedups_and_keeps_order() {
        let registry = ShardTableRegistry::new();
        let user = label("demo.user");

        assert!(registry.record_shard(&user, &table("user_1")));
        assert!(registry.record_shard(&user, &table("user_0")));
        assert!(!registry.record_shard(&user, &table("user_1")));

        assert_eq!(registry.tables_for(&user).unwrap(), vec![table("user_1"), table("user_0")]);
    }

    #[test]
    fn test_record_shard_large_entity() {
        let registry = ShardTableRegistry::new();
        let log = label("demo.log");
        let tables: Vec<TableName> = (0..100_000).map(|i| table(&format!("log_{}", i))).collect();

        for name in &tables {
            assert!(registry.record_shard(&log, name));
        }
        for name in tables.iter().step_by(997) {
            assert!(!registry.record_shard(&log, name));
        }

        let recorded = registry.tables_for(&log).unwrap();
        assert_eq!(recorded.len(), 100_000);
        assert_eq!(recorded[42_000], tables[42_000]);
    }

    #[test]
    fn test_register_last_write_wins() {
        let registry = ShardTableRegistry::new();
        let log = label("demo.log");

        registry.register(&log, AdminOptions::with_list_display(["id"]));
        registry.record_shard(&log, &table("log_2020"));
        registry.register(&log, AdminOptions::with_list_display(["id", "time"]));

        assert_eq!(registry.admin_opts(&log).unwrap().list_display, vec!["id", "time"]);
        assert_eq!(registry.tables_for(&log).unwrap().len(), 1);
    }

    #[test]
    fn test_snapshot_is_ordered_and_detached() {
        let registry = ShardTableRegistry::new();
        registry.record_shard(&label("demo.user"), &table("user_0"));
        registry.record_shard(&label("demo.log"), &table("log_2020"));

        let snapshot = registry.snapshot();
        registry.record_shard(&label("demo.user"), &table("user_1"));

        let labels: Vec<&str> = snapshot.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["demo.log", "demo.user"]);
        assert_eq!(snapshot.table_count(), 2);
        assert_eq!(registry.snapshot().table_count(), 3);
    }

    #[test]
    fn test_snapshot_display() {
        let registry = ShardTableRegistry::new();
        let log = label("demo.log");
        registry.register(&log, AdminOptions::with_list_display(["id", "level"]));
        registry.record_shard(&log, &table("log_2020"));
        registry.record_shard(&log, &table("log_2021"));

        let dump = registry.snapshot().to_string();
        assert!(dump.contains("demo.log (2 shards)"));
        assert!(dump.contains("tables: [log_2020, log_2021]"));
        assert!(dump.contains("list_display: [id, level]"));
        assert!(ShardTableRegistry::new().snapshot().to_string().contains("no sharded entities"));
    }

    #[test]
    fn test_snapshot_json() {
        let registry = ShardTableRegistry::new();
        let user = label("demo.user");
        registry.register(&user, AdminOptions::with_list_display(["id"]));
        registry.record_shard(&user, &table("user_0"));

        let json = serde_json::to_value(registry.snapshot()).unwrap();
        assert_eq!(json["demo.user"]["tables"][0], "user_0");
        assert_eq!(json["demo.user"]["admin_opts"]["list_display"][0], "id");
    }
}
