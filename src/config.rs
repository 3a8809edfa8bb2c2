// Configuration module
//
// Types and loader live in shardtab-configs; re-exported here so the binary
// and integration tests share one import path.

pub use shardtab_configs::*;
