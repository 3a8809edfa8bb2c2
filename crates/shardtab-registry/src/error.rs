use shardtab_sharding::ShardingError;
use thiserror::Error;

/// Errors raised while registering shard tables
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Two distinct entities resolve to the same concrete table
    #[error(
        "Duplicate table name '{table}': owned by '{existing_label}', requested by '{requested_label}'"
    )]
    DuplicateTableName {
        table: String,
        existing_label: String,
        requested_label: String,
    },

    #[error("Invalid table name for entity '{label}': {reason}")]
    InvalidTableName { label: String, reason: String },

    #[error(transparent)]
    Sharding(#[from] ShardingError),

    #[error("Shard history error: {0}")]
    History(String),
}

impl RegistryError {
    pub fn is_not_shardable(&self) -> bool {
        matches!(self, RegistryError::Sharding(ShardingError::NotShardable(_)))
    }

    pub fn is_invalid_policy(&self) -> bool {
        matches!(self, RegistryError::Sharding(ShardingError::InvalidPolicy(_)))
    }
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
