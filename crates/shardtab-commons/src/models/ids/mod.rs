mod namespace_id;
mod shard_key;
mod table_id;

pub use namespace_id::NamespaceId;
pub use shard_key::ShardKey;
pub use table_id::TableId;
