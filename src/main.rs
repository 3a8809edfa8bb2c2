// shardtab entrypoint
//!
//! Loads configuration, installs logging, registers every configured entity's
//! shard tables and prints the resulting registry to stdout.

mod args;

use anyhow::Result;
use args::Cli;
use clap::Parser;
use log::info;
use shardtab_server::config::ServerConfig;
use shardtab_server::lifecycle::{bootstrap, render_dump};
use shardtab_server::logging;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = &cli.config;
    let mut config = match ServerConfig::from_file(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("❌ FATAL: Failed to load {}: {}", config_path.display(), e);
            std::process::exit(1);
        }
    };
    if let Err(e) = apply_overrides(&mut config) {
        eprintln!("❌ FATAL: Invalid configuration: {}", e);
        std::process::exit(1);
    }

    // Logging before any other side effects
    let log_path = format!("{}/shardtab.log", config.logging.logs_path);
    logging::init_logging(
        &config.logging.level,
        &log_path,
        config.logging.log_to_console,
        Some(&config.logging.targets),
        &config.logging.format,
    )?;

    let version = env!("CARGO_PKG_VERSION");
    let commit = env!("GIT_COMMIT_HASH");
    let build_date = env!("BUILD_DATE");
    let branch = env!("GIT_BRANCH");

    info!("╔═══════════════════════════════════════════════════════════════╗");
    info!("║           shardtab v{:<43} ║", version);
    info!("╠═══════════════════════════════════════════════════════════════╣");
    info!("║  Commit:     {:<49} ║", commit);
    info!("║  Branch:     {:<49} ║", branch);
    info!("║  Built:      {:<49} ║", build_date);
    info!("╚═══════════════════════════════════════════════════════════════╝");
    info!("Config: {}  Namespace: {}", config_path.display(), config.sharding.namespace);

    let components = match bootstrap(&config) {
        Ok(components) => components,
        Err(e) => {
            log::error!("Shard registration failed: {}", e);
            eprintln!("❌ FATAL: Shard registration failed: {}", e);
            std::process::exit(1);
        }
    };

    let dump = render_dump(&components.registry.snapshot(), &config.sharding.dump_format)?;
    println!("{}", dump);

    Ok(())
}

fn apply_overrides(config: &mut ServerConfig) -> Result<()> {
    config.apply_env_overrides()?;
    config.finalize()
}
