use thiserror::Error;

/// Errors raised while validating or resolving a sharding policy
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShardingError {
    /// Non-positive count, unparseable date, inverted range or bad format
    #[error("Invalid sharding policy: {0}")]
    InvalidPolicy(String),

    /// Policy type outside {precise, date}
    #[error("Unsupported sharding type: '{0}'")]
    UnsupportedShardingType(String),

    /// Entity does not implement the shardable contract
    #[error("Entity '{0}' is not shardable")]
    NotShardable(String),
}

impl ShardingError {
    pub fn invalid_policy(msg: impl Into<String>) -> Self {
        Self::InvalidPolicy(msg.into())
    }
}

/// Result type for sharding operations
pub type Result<T> = std::result::Result<T, ShardingError>;
