//! Structured logging for Omphalos.
//!
//! Installs a `tracing` subscriber with console output and, in debug builds
//! or when the config asks for it, JSON file logging for post-mortem
//! analysis. The filter honours `RUST_LOG` first and falls back to the
//! configured log level.

use std::path::{Path, PathBuf};

use omphalos_config::Config;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config names one.
pub const DEFAULT_FILTER: &str = "info";

/// Name of the JSON log file.
pub const LOG_FILE: &str = "omphalos.log";

/// Initialize the global tracing subscriber.
///
/// Sets up:
/// - Console output with uptime timestamps, targets and levels
/// - JSON file logging into `log_dir/omphalos.log` when `debug_build` or
///   `config.debug.log_to_file` is set
/// - Filtering from `RUST_LOG`, else `config.debug.log_level`, else [`DEFAULT_FILTER`]
///
/// A log directory that cannot be created only disables the file layer.
/// Fails if a global subscriber is already installed.
///
/// ```no_run
/// use omphalos_config::Config;
/// use omphalos_log::init_logging;
///
/// let config = Config::default();
/// init_logging(Some(std::path::Path::new("./logs")), true, Some(&config))
///     .expect("logging already initialised");
/// ```
pub fn init_logging(
    log_dir: Option<&Path>,
    debug_build: bool,
    config: Option<&Config>,
) -> Result<(), TryInitError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter_for(config));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if file_logging_enabled(debug_build, config)
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_file_path(log_dir))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        return subscriber.with(file_layer).try_init();
    }

    subscriber.try_init()
}

/// Whether the JSON file layer is installed: always in debug builds, and in
/// release builds when the config asks for it.
pub fn file_logging_enabled(debug_build: bool, config: Option<&Config>) -> bool {
    debug_build || config.is_some_and(|c| c.debug.log_to_file)
}

/// An `EnvFilter` with [`DEFAULT_FILTER`].
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

/// The filter named by `config.debug.log_level`, or the default when the
/// config is absent or its level is blank.
pub fn filter_for(config: Option<&Config>) -> EnvFilter {
    match config.map(|c| c.debug.log_level.trim()) {
        Some(level) if !level.is_empty() => EnvFilter::new(level),
        _ => default_env_filter(),
    }
}

/// Path of the JSON log file inside `log_dir`.
pub fn log_file_path(log_dir: &Path) -> PathBuf {
    log_dir.join(LOG_FILE)
}
