use crate::config::Config;
use crate::error::{QuickshareError, Result};
use std::sync::Once;
use tracing::debug;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*, registry::Registry};

static LOGGER_INIT: Once = Once::new();

/// Initialize the logging system. Safe to call more than once; only the
/// first call takes effect.
pub fn init_logging(config: &Config, verbose: bool) -> Result<()> {
    let mut init_result = Ok(());

    LOGGER_INIT.call_once(|| {
        init_result = init_logging_internal(config, verbose);
    });

    init_result
}

fn init_logging_internal(config: &Config, verbose: bool) -> Result<()> {
    let log_level = if verbose {
        "debug".to_string()
    } else {
        config.logging.level.to_lowercase()
    };

    // Environment variable takes precedence over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log_level))
        .map_err(|e| {
            QuickshareError::ConfigError(format!("Invalid log level '{log_level}': {e}"))
        })?;

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(false);

    let subscriber = Registry::default().with(filter).with(stdout_layer);

    if config.logging.file_enabled {
        let log_dir = config.get_log_dir();
        std::fs::create_dir_all(&log_dir).map_err(|e| {
            QuickshareError::ConfigError(format!("Failed to create log directory: {e}"))
        })?;

        let file_appender = tracing_appender::rolling::never(&log_dir, "quickshare.log");
        let file_layer = fmt::layer()
            .with_writer(file_appender)
            .with_ansi(false)
            .with_target(true);

        subscriber.with(file_layer).init();
    } else {
        subscriber.init();
    }

    debug!("Logging initialized with level: {}", log_level);

    Ok(())
}
