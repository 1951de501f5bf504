//! Logging utilities built on the `log` facade and `env_logger`

pub use log::{debug, info, warn, error, trace};

use crate::config::LoggingConfig;

/// Initialize the logging system from `RUST_LOG`
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    let _ = env_logger::try_init();
}

/// Initialize the logging system with a configured default level
///
/// `RUST_LOG` still takes precedence when it is set.
pub fn init_with_config(config: &LoggingConfig) {
    let env = env_logger::Env::default().default_filter_or(config.level.as_str());
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init();
}
