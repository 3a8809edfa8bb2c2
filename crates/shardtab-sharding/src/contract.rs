//! The capability an abstract entity needs to be shardable.
//!
//! An entity schema exposes its label, table prefix and fields. It becomes
//! shardable by also exposing its policy fields through [`Shardable`];
//! `get_sharding_list` is provided on top of those fields and delegates to
//! the resolver.

use std::fmt;
use std::sync::Arc;

use shardtab_commons::{EntityLabel, FieldDefinition, ShardKey};

use crate::clock::Clock;
use crate::error::{Result, ShardingError};
use crate::policy::{ShardingPolicy, ShardingSpec};
use crate::resolver::resolve_spec;

/// Sharding contract: policy fields plus key resolution.
pub trait Shardable {
    /// Policy fields as declared.
    fn sharding_spec(&self) -> &ShardingSpec;

    fn sharding_policy(&self) -> Result<ShardingPolicy> {
        ShardingPolicy::from_spec(self.sharding_spec())
    }

    /// Ordered, duplicate-free shard keys of this entity.
    fn get_sharding_list(&self, clock: &dyn Clock) -> Result<Vec<ShardKey>> {
        resolve_spec(self.sharding_spec(), clock)
    }
}

impl Shardable for ShardingSpec {
    fn sharding_spec(&self) -> &ShardingSpec {
        self
    }
}

/// Abstract entity: the schema template every shard is generated from.
pub trait EntitySchema: Send + Sync + fmt::Debug {
    fn label(&self) -> &EntityLabel;

    /// Prefix each shard key is appended to (`"user_"` → `user_3`).
    fn table_prefix(&self) -> &str;

    fn fields(&self) -> &[FieldDefinition];

    /// Field list handed to every generated shard.
    fn shared_fields(&self) -> Arc<[FieldDefinition]> {
        Arc::from(self.fields())
    }

    /// `Some` when the entity implements the sharding contract.
    fn as_shardable(&self) -> Option<&dyn Shardable> {
        None
    }
}

/// Capability check run before any shard of `schema` is created.
pub fn ensure_shardable(schema: &dyn EntitySchema) -> Result<&dyn Shardable> {
    schema
        .as_shardable()
        .ok_or_else(|| ShardingError::NotShardable(schema.label().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    #[derive(Debug)]
    struct PlainEntity {
        label: EntityLabel,
    }

    impl EntitySchema for PlainEntity {
        fn label(&self) -> &EntityLabel {
            &self.label
        }

        fn table_prefix(&self) -> &str {
            "plain_"
        }

        fn fields(&self) -> &[FieldDefinition] {
            &[]
        }
    }

    #[derive(Debug)]
    struct Visit {
        label: EntityLabel,
        sharding: ShardingSpec,
    }

    impl Shardable for Visit {
        fn sharding_spec(&self) -> &ShardingSpec {
            &self.sharding
        }
    }

    impl EntitySchema for Visit {
        fn label(&self) -> &EntityLabel {
            &self.label
        }

        fn table_prefix(&self) -> &str {
            "visit_"
        }

        fn fields(&self) -> &[FieldDefinition] {
            &[]
        }

        fn as_shardable(&self) -> Option<&dyn Shardable> {
            Some(self)
        }
    }

    #[test]
    fn test_plain_entity_is_not_shardable() {
        let plain = PlainEntity {
            label: EntityLabel::try_new("demo.plain").unwrap(),
        };
        assert_eq!(
            ensure_shardable(&plain).err(),
            Some(ShardingError::NotShardable("demo.plain".to_string()))
        );
    }

    #[test]
    fn test_get_sharding_list_uses_own_policy() {
        let visit = Visit {
            label: EntityLabel::try_new("demo.visit").unwrap(),
            sharding: ShardingSpec::date("2022-06-15", "%Y-%m").with_end("2022-08-01"),
        };
        let clock = FixedClock::from_ymd(2030, 1, 1).unwrap();
        let keys = ensure_shardable(&visit).unwrap().get_sharding_list(&clock).unwrap();
        let rendered: Vec<&str> = keys.iter().map(ShardKey::as_str).collect();
        assert_eq!(rendered, vec!["2022-06", "2022-07", "2022-08"]);
    }
}
