//! Command-line arguments of the `shardtab` binary

use clap::Parser;
use std::path::PathBuf;

macro_rules! version_string {
    () => {
        concat!(
            env!("CARGO_PKG_VERSION"),
            "\nCommit: ",
            env!("GIT_COMMIT_HASH"),
            " (",
            env!("GIT_BRANCH"),
            ")\nBuilt: ",
            env!("BUILD_DATE")
        )
    };
}

#[derive(Parser, Debug)]
#[command(name = "shardtab")]
#[command(version = version_string!())]
#[command(about = "Resolve shard tables for the configured entities and print the registry", long_about = None)]
pub struct Cli {
    /// Configuration file
    #[arg(short = 'c', long = "config", env = "SHARDTAB_CONFIG", default_value = "config.toml")]
    pub config: PathBuf,
}
