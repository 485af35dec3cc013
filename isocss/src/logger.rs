// isocss/src/logger.rs
//! Logger setup for the isocss binary.
//!
//! Diagnostics go through the `log` facade to stderr. `RUST_LOG` is honoured
//! (defaulting to `warn`) unless the command line forces a level.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the global logger. Calling it more than once is harmless.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format_timestamp(None);
    let _ = builder.try_init();
}
