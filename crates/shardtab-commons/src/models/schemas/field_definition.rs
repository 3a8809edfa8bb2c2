//! Field definition for entity schemas

use super::field_type::FieldType;
use serde::{Deserialize, Serialize};

/// Definition of one field of an abstract entity.
///
/// Every concrete shard carries the same list of definitions; only the table
/// name differs between shards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field name (case-insensitive, stored as lowercase)
    pub field_name: String,

    pub field_type: FieldType,

    /// Ordinal position in the entity (1-indexed, sequential)
    #[serde(default)]
    pub ordinal_position: u32,

    #[serde(default)]
    pub is_nullable: bool,

    #[serde(default)]
    pub is_unique: bool,

    #[serde(default)]
    pub is_primary_key: bool,

    /// Literal default used on insert, rendered as text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl FieldDefinition {
    /// Name of the implicit primary key added to entities that declare none.
    pub const IMPLICIT_ID: &'static str = "id";

    /// Create a non-null, non-unique field
    pub fn simple(field_name: impl Into<String>, ordinal_position: u32, field_type: FieldType) -> Self {
        Self {
            field_name: field_name.into().to_lowercase(),
            field_type,
            ordinal_position,
            is_nullable: false,
            is_unique: false,
            is_primary_key: false,
            default_value: None,
        }
    }

    /// Create the implicit auto-increment `id` primary key
    pub fn auto_id() -> Self {
        Self {
            is_unique: true,
            is_primary_key: true,
            ..Self::simple(Self::IMPLICIT_ID, 1, FieldType::AutoId)
        }
    }

    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}
