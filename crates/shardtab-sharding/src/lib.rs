//! Shard key resolution.
//!
//! Turns a sharding policy into the ordered, duplicate-free list of shard keys
//! an abstract entity is split into:
//! - **Precise**: a fixed shard count, keys `"0" .. "count-1"`
//! - **Date range**: one key per formatted date bucket between a start date
//!   and an end date (or "today" when the range is open-ended)
//!
//! Everything here is pure apart from reading the injected [`Clock`] for
//! open-ended date ranges.

mod clock;
mod contract;
mod date_format;
mod descriptor;
mod error;
mod policy;
mod resolver;

pub use clock::{Clock, FixedClock, SystemClock};
pub use contract::{ensure_shardable, EntitySchema, Shardable};
pub use date_format::{BucketFormat, Granularity};
pub use descriptor::{EntityDescriptor, EntityDescriptorBuilder};
pub use error::{Result, ShardingError};
pub use policy::{
    parse_policy_date, DateRangeEnd, DateRangePolicy, ShardingPolicy, ShardingSpec, ShardingType,
    DEFAULT_DATE_FORMAT, MAX_PRECISE_SHARDS,
};
pub use resolver::{resolve, resolve_at, resolve_spec, MAX_DATE_BUCKETS};
