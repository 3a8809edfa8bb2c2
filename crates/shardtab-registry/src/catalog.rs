//! Namespace-scoped catalog of concrete shard entities.
//!
//! Every shard of an abstract entity becomes one [`ConcreteEntity`]: the same
//! field list under its own table name. The catalog is the lookup a storage
//! or query layer uses to answer "give me the entity for table `user_3`".
//!
//! **Architecture**:
//! - `DashMap<TableId, Arc<ConcreteEntity>>` as the primary index
//! - secondary `(namespace, label, key) → TableId` index for shard lookups
//! - entities are immutable once inserted; cloning a handle is an `Arc` bump

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::debug;
use shardtab_commons::{EntityLabel, FieldDefinition, NamespaceId, ShardKey, TableId, TableName};
use shardtab_sharding::EntitySchema;
use std::sync::Arc;

use crate::error::{RegistryError, Result};

/// One physical table generated from an abstract entity and a shard key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcreteEntity {
    table_id: TableId,
    label: EntityLabel,
    shard_key: ShardKey,
    fields: Arc<[FieldDefinition]>,
}

impl ConcreteEntity {
    pub fn table_id(&self) -> &TableId {
        &self.table_id
    }

    pub fn table_name(&self) -> &TableName {
        self.table_id.table_name()
    }

    pub fn namespace_id(&self) -> &NamespaceId {
        self.table_id.namespace_id()
    }

    /// Label of the abstract entity this shard was generated from
    pub fn label(&self) -> &EntityLabel {
        &self.label
    }

    pub fn shard_key(&self) -> &ShardKey {
        &self.shard_key
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.field_name.eq_ignore_ascii_case(name))
    }
}

/// Outcome of [`EntityCatalog::create`].
#[derive(Debug, Clone)]
pub enum Registration {
    /// A new entity was inserted
    Created(Arc<ConcreteEntity>),
    /// The same entity and key were registered before; nothing changed
    Existing(Arc<ConcreteEntity>),
}

impl Registration {
    pub fn entity(&self) -> &Arc<ConcreteEntity> {
        match self {
            Registration::Created(entity) | Registration::Existing(entity) => entity,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Registration::Created(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ShardRef {
    namespace_id: NamespaceId,
    label: EntityLabel,
    shard_key: ShardKey,
}

/// Concrete shard entities indexed by `(namespace, table)`.
#[derive(Debug, Default)]
pub struct EntityCatalog {
    entities: DashMap<TableId, Arc<ConcreteEntity>>,

    /// (namespace, label, key) → table, for lookups by shard instead of name
    shards: DashMap<ShardRef, TableId>,
}

impl EntityCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concrete table of `schema`'s shard `key` in `namespace`: `prefix + key`.
    pub fn table_id_for(
        schema: &dyn EntitySchema,
        key: &ShardKey,
        namespace: &NamespaceId,
    ) -> Result<TableId> {
        let raw = key.table_name_with_prefix(schema.table_prefix());
        let table_name = TableName::try_new(raw).map_err(|e| RegistryError::InvalidTableName {
            label: schema.label().to_string(),
            reason: e.to_string(),
        })?;
        Ok(TableId::new(namespace.clone(), table_name))
    }

    /// Fails with `DuplicateTableName` if `table_id` already belongs to a
    /// different entity or to a different shard of the same entity.
    pub fn check_available(&self, table_id: &TableId, label: &EntityLabel, key: &ShardKey) -> Result<()> {
        match self.entities.get(table_id) {
            Some(existing) => Self::check_same_shard(&existing, table_id, label, key),
            None => Ok(()),
        }
    }

    fn check_same_shard(
        existing: &ConcreteEntity,
        table_id: &TableId,
        label: &EntityLabel,
        key: &ShardKey,
    ) -> Result<()> {
        if existing.label() == label && existing.shard_key() == key {
            Ok(())
        } else {
            Err(RegistryError::DuplicateTableName {
                table: table_id.to_string(),
                existing_label: existing.label().to_string(),
                requested_label: label.to_string(),
            })
        }
    }

    /// Synthesize the concrete entity for one shard and register it.
    ///
    /// Replaying the same `(schema, key, namespace)` returns the existing
    /// handle. A table name already owned by another entity is an error and
    /// leaves the catalog unchanged.
    pub fn create(
        &self,
        schema: &dyn EntitySchema,
        key: &ShardKey,
        namespace: &NamespaceId,
    ) -> Result<Registration> {
        let table_id = Self::table_id_for(schema, key, namespace)?;

        match self.entities.entry(table_id.clone()) {
            Entry::Occupied(occupied) => {
                Self::check_same_shard(occupied.get(), &table_id, schema.label(), key)?;
                Ok(Registration::Existing(Arc::clone(occupied.get())))
            }
            Entry::Vacant(vacant) => {
                let entity = Arc::new(ConcreteEntity {
                    table_id: table_id.clone(),
                    label: schema.label().clone(),
                    shard_key: key.clone(),
                    fields: schema.shared_fields(),
                });
                vacant.insert(Arc::clone(&entity));
                self.shards.insert(
                    ShardRef {
                        namespace_id: namespace.clone(),
                        label: schema.label().clone(),
                        shard_key: key.clone(),
                    },
                    table_id.clone(),
                );
                debug!("Created shard entity {} for '{}'", table_id, schema.label());
                Ok(Registration::Created(entity))
            }
        }
    }

    pub fn get(&self, table_id: &TableId) -> Option<Arc<ConcreteEntity>> {
        self.entities.get(table_id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn get_by_name(&self, namespace: &NamespaceId, table_name: &TableName) -> Option<Arc<ConcreteEntity>> {
        let table_id = TableId::new(namespace.clone(), table_name.clone());
        self.get(&table_id)
    }

    /// Look up a shard by its entity label and key.
    pub fn find_shard(
        &self,
        namespace: &NamespaceId,
        label: &EntityLabel,
        key: &ShardKey,
    ) -> Option<Arc<ConcreteEntity>> {
        let shard = ShardRef {
            namespace_id: namespace.clone(),
            label: label.clone(),
            shard_key: key.clone(),
        };
        let table_id = self.shards.get(&shard).map(|entry| entry.value().clone())?;
        self.get(&table_id)
    }

    /// All tables registered in `namespace`, sorted by name.
    pub fn tables_in(&self, namespace: &NamespaceId) -> Vec<TableName> {
        let mut tables: Vec<TableName> = self
            .entities
            .iter()
            .filter(|entry| entry.key().namespace_id() == namespace)
            .map(|entry| entry.key().table_name().clone())
            .collect();
        tables.sort();
        tables
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Drop every entity. Only for an explicit, externally serialized re-init.
    pub fn clear(&self) {
        self.entities.clear();
        self.shards.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shardtab_commons::FieldType;
    use shardtab_sharding::{EntityDescriptor, ShardingSpec};

    fn user(prefix: &str, label: &str) -> EntityDescriptor {
        EntityDescriptor::builder(label, prefix)
            .field(FieldDefinition::simple("name", 0, FieldType::Char { max_length: 50 }))
            .sharding(ShardingSpec::precise(10))
            .build()
            .unwrap()
    }

    fn ns() -> NamespaceId {
        NamespaceId::new("apps.demo.models")
    }

    #[test]
    fn test_create_computes_table_name() {
        let catalog = EntityCatalog::new();
        let registration = catalog.create(&user("user_", "demo.user"), &ShardKey::new("3"), &ns()).unwrap();
        assert!(registration.is_new());

        let entity = registration.entity();
        assert_eq!(entity.table_name().as_str(), "user_3");
        assert_eq!(entity.label().as_str(), "demo.user");
        assert_eq!(entity.shard_key().as_str(), "3");
        assert!(entity.field("NAME").is_some());
        assert!(entity.field("id").is_some());
    }

    #[test]
    fn test_create_is_idempotent() {
        let catalog = EntityCatalog::new();
        let descriptor = user("user_", "demo.user");
        let key = ShardKey::new("3");

        let first = catalog.create(&descriptor, &key, &ns()).unwrap();
        let second = catalog.create(&descriptor, &key, &ns()).unwrap();

        assert!(first.is_new());
        assert!(!second.is_new());
        assert!(Arc::ptr_eq(first.entity(), second.entity()));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_same_prefix_different_entities_collide() {
        let catalog = EntityCatalog::new();
        let key = ShardKey::new("0");
        catalog.create(&user("a_", "demo.first"), &key, &ns()).unwrap();

        let err = catalog.create(&user("a_", "demo.second"), &key, &ns()).unwrap_err();
        match err {
            RegistryError::DuplicateTableName {
                table,
                existing_label,
                requested_label,
            } => {
                assert_eq!(table, "apps.demo.models.a_0");
                assert_eq!(existing_label, "demo.first");
                assert_eq!(requested_label, "demo.second");
            }
            other => panic!("unexpected error {:?}", other),
        }

        let kept = catalog.get_by_name(&ns(), &TableName::try_new("a_0").unwrap()).unwrap();
        assert_eq!(kept.label().as_str(), "demo.first");
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_namespaces_are_isolated() {
        let catalog = EntityCatalog::new();
        let key = ShardKey::new("0");
        catalog.create(&user("a_", "demo.first"), &key, &NamespaceId::new("one")).unwrap();
        catalog.create(&user("a_", "demo.second"), &key, &NamespaceId::new("two")).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.tables_in(&NamespaceId::new("one")).len(), 1);
    }

    #[test]
    fn test_find_shard_by_label_and_key() {
        let catalog = EntityCatalog::new();
        let descriptor = user("user_", "demo.user");
        for i in 0..3u32 {
            catalog.create(&descriptor, &ShardKey::from_index(i), &ns()).unwrap();
        }

        let label = EntityLabel::try_new("demo.user").unwrap();
        let found = catalog.find_shard(&ns(), &label, &ShardKey::new("2")).unwrap();
        assert_eq!(found.table_name().as_str(), "user_2");
        assert!(catalog.find_shard(&ns(), &label, &ShardKey::new("7")).is_none());

        let names: Vec<String> = catalog.tables_in(&ns()).into_iter().map(TableName::into_string).collect();
        assert_eq!(names, vec!["user_0", "user_1", "user_2"]);
    }

    #[test]
    fn test_invalid_generated_name() {
        let catalog = EntityCatalog::new();
        let err = catalog
            .create(&user("user_", "demo.user"), &ShardKey::new("2021/03"), &ns())
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidTableName { .. }));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_get_and_clear() {
        let catalog = EntityCatalog::new();
        let descriptor = user("user_", "demo.user");
        let created = catalog.create(&descriptor, &ShardKey::new("0"), &ns()).unwrap();

        assert!(catalog.get(created.entity().table_id()).is_some());
        assert!(catalog.get_by_name(&ns(), &TableName::try_new("user_9").unwrap()).is_none());
        assert_eq!(catalog.len(), 1);

        catalog.clear();
        assert!(catalog.is_empty());
        assert!(catalog
            .find_shard(&ns(), &EntityLabel::try_new("demo.user").unwrap(), &ShardKey::new("0"))
            .is_none());
    }
}
