//! # shardtab-commons
//!
//! Shared identifiers and schema models used by every shardtab crate.
//!
//! Nothing in here knows how shards are resolved or registered; the crate only
//! carries the vocabulary the engine crates speak:
//! - `NamespaceId`: scope of the entity catalog (the "module" a shard lives in)
//! - `TableName`: validated, lower-cased physical table name
//! - `TableId`: `(namespace, table)` composite key of the catalog
//! - `EntityLabel`: fully qualified logical name of an abstract entity
//! - `ShardKey`: per-shard suffix appended to a table prefix
//!
//! ## Example Usage
//!
//! ```rust
//! use shardtab_commons::models::{NamespaceId, ShardKey, TableId, TableName};
//!
//! let key = ShardKey::new("3");
//! let table = TableName::try_new(format!("user_{}", key)).unwrap();
//! let table_id = TableId::new(NamespaceId::new("demo"), table);
//! assert_eq!(table_id.to_string(), "demo.user_3");
//! ```

pub mod errors;
pub mod models;

pub use errors::{CommonError, Result};
pub use models::{
    AdminOptions, EntityLabel, FieldDefinition, FieldType, NamespaceId, ShardKey, TableId,
    TableName, TableNameValidationError,
};
