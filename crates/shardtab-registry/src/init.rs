//! Startup registration pass.
//!
//! For every abstract entity: check it is shardable, resolve its shard keys,
//! synthesize one concrete entity per key and record the resulting tables and
//! admin options in the [`ShardTableRegistry`].
//!
//! The pass is planned fully before anything is written, so a bad policy, a
//! non-shardable entity or a table-name collision anywhere in the input
//! leaves the catalog, the registry and the history untouched.

use crate::catalog::EntityCatalog;
use crate::error::{RegistryError, Result};
use crate::history::ShardHistory;
use crate::shard_tables::ShardTableRegistry;
use log::{debug, info, warn};
use shardtab_commons::{AdminOptions, EntityLabel, NamespaceId, ShardKey, TableId};
use shardtab_sharding::{ensure_shardable, Clock, EntitySchema};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// One abstract entity to register, with its admin display options.
#[derive(Debug, Clone)]
pub struct EntityRegistration {
    pub schema: Arc<dyn EntitySchema>,
    pub admin_opts: AdminOptions,
}

impl EntityRegistration {
    pub fn new(schema: Arc<dyn EntitySchema>, admin_opts: AdminOptions) -> Self {
        Self { schema, admin_opts }
    }
}

/// Summary of a completed pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitReport {
    pub entities: usize,
    pub tables: usize,
    pub created: usize,
    pub replayed: usize,
    pub retained_from_history: usize,
    /// Keys resolved for the first time; only counted when a history is used
    pub new_since_history: usize,
    pub elapsed: Duration,
}

impl fmt::Display for InitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entities, {} tables ({} created, {} already registered, {} kept from history, {} new since last run) in {:.2?}",
            self.entities,
            self.tables,
            self.created,
            self.replayed,
            self.retained_from_history,
            self.new_since_history,
            self.elapsed
        )
    }
}

struct PlannedEntity<'r> {
    registration: &'r EntityRegistration,
    keys: Vec<ShardKey>,
    retained: usize,
    new_keys: usize,
}

/// Builder-style runner of the registration pass.
///
/// ```rust,ignore
/// let report = InitPass::new(&catalog, &registry, &SystemClock)
///     .namespace(NamespaceId::new("apps.demo.models"))
///     .history(&mut history)
///     .run(&registrations)?;
/// ```
pub struct InitPass<'a> {
    catalog: &'a EntityCatalog,
    registry: &'a ShardTableRegistry,
    clock: &'a dyn Clock,
    namespace: NamespaceId,
    history: Option<&'a mut ShardHistory>,
}

impl<'a> InitPass<'a> {
    pub fn new(catalog: &'a EntityCatalog, registry: &'a ShardTableRegistry, clock: &'a dyn Clock) -> Self {
        Self {
            catalog,
            registry,
            clock,
            namespace: NamespaceId::default(),
            history: None,
        }
    }

    /// Namespace the concrete entities are registered under.
    pub fn namespace(mut self, namespace: NamespaceId) -> Self {
        self.namespace = namespace;
        self
    }

    /// Merge resolved keys with `history` and record the merged lists back
    /// into it once the pass succeeds.
    pub fn history(mut self, history: &'a mut ShardHistory) -> Self {
        self.history = Some(history);
        self
    }

    pub fn run(self, registrations: &[EntityRegistration]) -> Result<InitReport> {
        let started = Instant::now();
        let plan = self.plan(registrations)?;

        let mut report = InitReport {
            entities: plan.len(),
            ..InitReport::default()
        };

        for planned in &plan {
            let schema = planned.registration.schema.as_ref();
            for key in &planned.keys {
                let registration = self.catalog.create(schema, key, &self.namespace)?;
                if registration.is_new() {
                    report.created += 1;
                } else {
                    report.replayed += 1;
                }
                self.registry.record_shard(schema.label(), registration.entity().table_name());
            }
            self.registry.register(schema.label(), planned.registration.admin_opts.clone());
            report.tables += planned.keys.len();
            report.retained_from_history += planned.retained;
            report.new_since_history += planned.new_keys;

            debug!(
                "Registered '{}' with {} shard tables",
                schema.label(),
                planned.keys.len()
            );
        }

        if let Some(history) = self.history {
            for planned in plan {
                history.record(planned.registration.schema.label(), planned.keys);
            }
        }

        report.elapsed = started.elapsed();
        info!("Shard table registration complete: {}", report);
        Ok(report)
    }

    /// Resolve every entity and check every table it would create, without
    /// touching any state.
    fn plan<'r>(&self, registrations: &'r [EntityRegistration]) -> Result<Vec<PlannedEntity<'r>>> {
        let mut plan = Vec::with_capacity(registrations.len());
        let mut claimed: HashMap<TableId, (EntityLabel, ShardKey)> = HashMap::new();

        for registration in registrations {
            let schema = registration.schema.as_ref();
            let shardable = ensure_shardable(schema)?;
            let policy = shardable.sharding_policy()?;
            let history = self.history.as_deref();
            let historic = history.map_or(&[][..], |h| h.keys_for(schema.label()));

            let today = self.clock.today();
            let resolved = if policy.starts_after(today) && !historic.is_empty() {
                // Clock behind the range start; the materialized shards stay.
                warn!(
                    "'{}' has not started as of {}; keeping {} shard(s) from history",
                    schema.label(),
                    today,
                    historic.len()
                );
                Vec::new()
            } else {
                shardable.get_sharding_list(self.clock)?
            };

            let (keys, retained, new_keys) = match history {
                Some(history) => {
                    let merge = history.merge(schema.label(), &resolved);
                    if merge.retained > 0 {
                        warn!(
                            "'{}' keeps {} shard(s) from history that its policy no longer resolves",
                            schema.label(),
                            merge.retained
                        );
                    }
                    (merge.keys, merge.retained, merge.added)
                }
                None => (resolved, 0, 0),
            };

            for key in &keys {
                let table_id = EntityCatalog::table_id_for(schema, key, &self.namespace)?;
                self.catalog.check_available(&table_id, schema.label(), key)?;

                if let Some((owner, owner_key)) = claimed.get(&table_id) {
                    if owner != schema.label() || owner_key != key {
                        return Err(RegistryError::DuplicateTableName {
                            table: table_id.to_string(),
                            existing_label: owner.to_string(),
                            requested_label: schema.label().to_string(),
                        });
                    }
                } else {
                    claimed.insert(table_id, (schema.label().clone(), key.clone()));
                }
            }

            plan.push(PlannedEntity {
                registration,
                keys,
                retained,
                new_keys,
            });
        }

        Ok(plan)
    }
}
