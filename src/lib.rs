//! shardtab server library
//!
//! Exposes the startup pipeline (config → logging → shard registration →
//! registry dump) for the binary and for integration testing.

pub mod config;
pub mod lifecycle;
pub mod logging;
