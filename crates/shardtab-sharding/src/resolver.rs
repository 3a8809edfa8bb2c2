//! Shard key resolution.

use chrono::NaiveDate;
use log::debug;
use std::collections::HashSet;

use crate::clock::Clock;
use crate::error::{Result, ShardingError};
use crate::policy::{DateRangePolicy, ShardingPolicy, ShardingSpec};
use shardtab_commons::ShardKey;

/// Upper bound on the number of buckets a date range may expand to.
pub const MAX_DATE_BUCKETS: usize = 100_000;

/// Resolve a policy against the clock's current date.
pub fn resolve(policy: &ShardingPolicy, clock: &dyn Clock) -> Result<Vec<ShardKey>> {
    resolve_at(policy, clock.today())
}

/// Validate a declared policy and resolve it.
pub fn resolve_spec(spec: &ShardingSpec, clock: &dyn Clock) -> Result<Vec<ShardKey>> {
    resolve(&ShardingPolicy::from_spec(spec)?, clock)
}

/// Resolve a policy as if today were `today`.
///
/// Keys come back in ascending order (numeric for precise policies,
/// chronological for date ranges) with duplicates removed.
pub fn resolve_at(policy: &ShardingPolicy, today: NaiveDate) -> Result<Vec<ShardKey>> {
    let keys = match policy {
        ShardingPolicy::Precise { count } => resolve_precise(*count)?,
        ShardingPolicy::DateRange(range) => resolve_date_range(range, today)?,
    };
    debug!(
        "Resolved {} policy to {} shard keys",
        policy.sharding_type(),
        keys.len()
    );
    Ok(keys)
}

fn resolve_precise(count: u32) -> Result<Vec<ShardKey>> {
    if count == 0 {
        return Err(ShardingError::invalid_policy("shard count must be positive, got 0"));
    }
    Ok((0..count).map(ShardKey::from_index).collect())
}

fn resolve_date_range(range: &DateRangePolicy, today: NaiveDate) -> Result<Vec<ShardKey>> {
    let start = range.start();
    let end = range.end_date(today);
    if end < start {
        return Err(ShardingError::invalid_policy(format!(
            "date range end {} is before start {}",
            end, start
        )));
    }

    let format = range.format();
    let granularity = format.granularity();
    debug!(
        "Walking {} buckets of '{}' from {} to {}",
        granularity,
        format.pattern(),
        start,
        end
    );
    let mut seen = HashSet::new();
    let mut keys = Vec::new();
    let mut cursor = Some(granularity.truncate(start));

    while let Some(bucket) = cursor.filter(|bucket| *bucket <= end) {
        let rendered = format.render(bucket)?;
        if seen.insert(rendered.clone()) {
            if keys.len() == MAX_DATE_BUCKETS {
                return Err(ShardingError::invalid_policy(format!(
                    "date range {}..{} expands to more than {} shards",
                    start, end, MAX_DATE_BUCKETS
                )));
            }
            keys.push(ShardKey::new(rendered));
        }
        cursor = granularity.step(bucket);
    }

    Ok(keys)
}
