//! Process-wide log setup for the `shardtab` binary.
//!
//! The library crates log through the `log` facade. `LogTracer` forwards
//! those records into the tracing subscriber installed here, so the init
//! pass span shows up around resolver and registry messages.
//!
//! stderr carries the console layer. stdout stays clean for the dump.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::path::Path;

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Dependencies that log more than a shard listing needs.
const QUIET_TARGETS: &[(&str, &str)] = &[("dashmap", "warn"), ("tracing", "warn")];

/// Line layout of the log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `timestamp LEVEL target: message`
    Compact,
    /// One JSON object per line, span list included.
    Json,
}

impl LogFormat {
    /// Anything other than `json`/`jsonl` falls back to compact.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" | "jsonl" => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// Filter directives: `level`, then [`QUIET_TARGETS`], then the
/// `[logging.targets]` table sorted by target name.
pub fn build_env_filter(
    level: &str,
    target_levels: Option<&HashMap<String, String>>,
) -> anyhow::Result<EnvFilter> {
    let mut configured: Vec<_> = target_levels.into_iter().flatten().collect();
    configured.sort();

    let directives = std::iter::once(level.to_string())
        .chain(QUIET_TARGETS.iter().map(|(target, lvl)| format!("{}={}", target, lvl)))
        .chain(configured.into_iter().map(|(target, lvl)| format!("{}={}", target, lvl)))
        .collect::<Vec<_>>()
        .join(",");

    EnvFilter::try_new(&directives)
        .map_err(|e| anyhow::anyhow!("Invalid log filter '{}': {}", directives, e))
}

fn open_log_file(file_path: &str) -> std::io::Result<File> {
    if let Some(dir) = Path::new(file_path).parent() {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(file_path)
}

/// Installs the global subscriber. Each layer gets its own filter built
/// from the same directives, and closed spans report their elapsed time.
///
/// Fails if the filter does not parse, the log file cannot be opened, or a
/// subscriber is already installed.
pub fn init_logging(
    level: &str,
    file_path: &str,
    log_to_console: bool,
    target_levels: Option<&HashMap<String, String>>,
    format: &str,
) -> anyhow::Result<()> {
    let log_file = open_log_file(file_path)?;

    // A second init in the same process is harmless.
    tracing_log::LogTracer::init().ok();

    let console_layer = match log_to_console {
        true => Some(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true)
                .with_target(true)
                .with_span_events(FmtSpan::CLOSE)
                .with_filter(build_env_filter(level, target_levels)?),
        ),
        false => None,
    };

    let file_layer = match LogFormat::parse(format) {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_span_list(true)
            .with_writer(log_file)
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(build_env_filter(level, target_levels)?)
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(build_env_filter(level, target_levels)?)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Could not install log subscriber: {}", e))?;

    tracing::trace!(level, log_to_console, file_path, "logging ready");
    Ok(())
}
