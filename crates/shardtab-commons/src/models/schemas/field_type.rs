//! Field kinds an entity descriptor can declare.

use serde::{Deserialize, Serialize};

/// Storage type of a field.
///
/// Serialized with an internal `kind` tag so configuration files read as
/// `{ kind = "char", max_length = 50 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldType {
    /// Auto-incrementing integer primary key
    AutoId,
    Char {
        max_length: u32,
    },
    Text,
    Integer,
    PositiveSmallInteger,
    Boolean,
    /// `auto_now` refreshes on every save, `auto_now_add` is set once on insert
    DateTime {
        #[serde(default)]
        auto_now: bool,
        #[serde(default)]
        auto_now_add: bool,
    },
}
