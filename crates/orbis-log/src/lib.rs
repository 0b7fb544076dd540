//! Structured logging for the Orbis tools.
//!
//! Console output with uptime timestamps, plus a JSON log file in debug builds.
//! The level comes from `RUST_LOG` when set, otherwise from the config's
//! `debug.log_level`.

use std::fs::File;
use std::path::Path;

use orbis_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info";
const LOG_FILE: &str = "orbis.log";

/// Install the global tracing subscriber.
///
/// * `log_dir` - directory for the JSON log file (debug builds only)
/// * `debug_build` - enables the file layer
/// * `config` - supplies the fallback log level
///
/// Calling this twice panics, as with any global subscriber.
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback_filter(config));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true) // workers are named biome-blend-worker-N
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && let Some(log_file) = open_log_file(log_dir)
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// The filter directive used when `RUST_LOG` is unset.
pub fn filter_directive(config: Option<&Config>) -> String {
    match config {
        Some(config) if !config.debug.log_level.trim().is_empty() => config.debug.log_level.clone(),
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// The filter installed when `RUST_LOG` is unset or invalid.
pub fn fallback_filter(config: Option<&Config>) -> EnvFilter {
    EnvFilter::new(filter_directive(config))
}

/// Create `log_dir` if needed and truncate `orbis.log` inside it.
///
/// Returns `None` when either step fails; logging then stays console-only.
fn open_log_file(log_dir: &Path) -> Option<File> {
    std::fs::create_dir_all(log_dir).ok()?;
    File::create(log_dir.join(LOG_FILE)).ok()
}
