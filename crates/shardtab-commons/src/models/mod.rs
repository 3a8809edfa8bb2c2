//! Identifier and schema models.

mod admin_options;
mod entity_label;
pub mod ids;
pub mod schemas;

pub use admin_options::AdminOptions;
pub use entity_label::EntityLabel;
pub use ids::{NamespaceId, ShardKey, TableId};
pub use schemas::{FieldDefinition, FieldType, TableName, TableNameValidationError};
