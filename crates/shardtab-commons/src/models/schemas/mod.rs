//! Schema models shared by every shard of an entity.

mod field_definition;
mod field_type;
mod table_name;

pub use field_definition::FieldDefinition;
pub use field_type::FieldType;
pub use table_name::{TableName, TableNameValidationError};
