//! shardtab-configs
//!
//! Configuration types and loader for the shardtab server.

pub mod config;
pub mod file_helpers;

pub use config::defaults;
pub use config::*;
