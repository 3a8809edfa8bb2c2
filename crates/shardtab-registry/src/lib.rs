//! Shard table registry and startup registration.
//!
//! Three pieces of process-wide state live here, each an explicit object
//! constructed once at startup and shared behind an `Arc`:
//! - [`EntityCatalog`]: namespace-scoped lookup of concrete shard entities,
//!   keyed by table; `create` is the factory that synthesizes them
//! - [`ShardTableRegistry`]: label → ordered shard tables + admin options
//! - [`ShardHistory`]: optional append-only record of every key ever resolved
//!
//! [`InitPass`] ties them together: it plans every entity's shard set, fails
//! before touching state if anything is wrong, then creates and records.
//! After the pass the catalog and registry are only read.

mod catalog;
mod error;
mod history;
mod init;
mod shard_tables;

pub use catalog::{ConcreteEntity, EntityCatalog, Registration};
pub use error::{RegistryError, Result};
pub use history::{HistoryMerge, ShardHistory};
pub use init::{EntityRegistration, InitPass, InitReport};
pub use shard_tables::{RegistrySnapshot, ShardTableEntry, ShardTableRegistry};
