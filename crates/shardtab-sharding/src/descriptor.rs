//! Declarative entity descriptor.
//!
//! The standard [`EntitySchema`] implementation, built from code or from
//! configuration. Sharding is optional at this level: a descriptor without
//! policy fields is a valid schema that simply fails the shardable check.

use std::collections::HashSet;
use std::sync::Arc;

use shardtab_commons::{CommonError, EntityLabel, FieldDefinition};

use crate::contract::{EntitySchema, Shardable};
use crate::policy::ShardingSpec;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDescriptor {
    label: EntityLabel,
    table_prefix: String,
    fields: Arc<[FieldDefinition]>,
    sharding: Option<ShardingSpec>,
}

impl EntityDescriptor {
    pub fn builder(label: impl Into<String>, table_prefix: impl Into<String>) -> EntityDescriptorBuilder {
        EntityDescriptorBuilder {
            label: label.into(),
            table_prefix: table_prefix.into(),
            fields: Vec::new(),
            sharding: None,
        }
    }

    pub fn sharding(&self) -> Option<&ShardingSpec> {
        self.sharding.as_ref()
    }
}

impl EntitySchema for EntityDescriptor {
    fn label(&self) -> &EntityLabel {
        &self.label
    }

    fn table_prefix(&self) -> &str {
        &self.table_prefix
    }

    fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    fn shared_fields(&self) -> Arc<[FieldDefinition]> {
        Arc::clone(&self.fields)
    }

    fn as_shardable(&self) -> Option<&dyn Shardable> {
        self.sharding.as_ref().map(|spec| spec as &dyn Shardable)
    }
}

#[derive(Debug, Clone)]
pub struct EntityDescriptorBuilder {
    label: String,
    table_prefix: String,
    fields: Vec<FieldDefinition>,
    sharding: Option<ShardingSpec>,
}

impl EntityDescriptorBuilder {
    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = FieldDefinition>) -> Self {
        self.fields.extend(fields);
        self
    }

    pub fn sharding(mut self, spec: ShardingSpec) -> Self {
        self.sharding = Some(spec);
        self
    }

    /// Validates the descriptor and numbers its fields.
    ///
    /// An auto `id` primary key is prepended when no declared field is a
    /// primary key.
    pub fn build(self) -> Result<EntityDescriptor, CommonError> {
        let label = EntityLabel::try_new(self.label)?;
        if self.table_prefix.trim().is_empty() {
            return Err(CommonError::invalid_input(format!(
                "Entity '{}' needs a non-empty table prefix",
                label
            )));
        }

        let mut fields = Vec::with_capacity(self.fields.len() + 1);
        if !self.fields.iter().any(|f| f.is_primary_key) {
            fields.push(FieldDefinition::auto_id());
        }
        fields.extend(self.fields);

        let mut names = HashSet::new();
        for (idx, field) in fields.iter_mut().enumerate() {
            field.field_name = field.field_name.to_lowercase();
            if !names.insert(field.field_name.clone()) {
                return Err(CommonError::already_exists(format!(
                    "field '{}' on entity '{}'",
                    field.field_name, label
                )));
            }
            field.ordinal_position = idx as u32 + 1;
        }

        Ok(EntityDescriptor {
            label,
            table_prefix: self.table_prefix,
            fields: fields.into(),
            sharding: self.sharding,
        })
    }
}
