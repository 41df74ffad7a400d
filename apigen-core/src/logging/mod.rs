//! Logging setup
//!
//! All crates log through the standard `log` facade (`info!`, `debug!`, ...).
//! [`init`] installs `env_logger` as the backend once per process, configured
//! from [`LoggingConfig`]. `RUST_LOG` directives are still honoured and are
//! applied on top of the configured level.

use crate::config::LoggingConfig;

/// Initialize the logger.
///
/// Safe to call multiple times: only the first successful call installs a logger.
/// Returns `false` when a logger was already installed.
pub fn init(config: &LoggingConfig) -> bool {
    let level = config.level_filter().unwrap_or(log::LevelFilter::Info);

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).format_module_path(false);

    if config.timestamps {
        builder.format_timestamp_millis();
    } else {
        builder.format_timestamp(None);
    }

    if let Ok(directives) = std::env::var("RUST_LOG") {
        builder.parse_filters(&directives);
    }

    builder.try_init().is_ok()
}
