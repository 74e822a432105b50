//! Logging setup.
//!
//! All logs go to **stderr**; stdout carries the handshake line read by the
//! host.
//!
//! # Environment Variables
//!
//! - `TFP_EXAMPLE_LOG`: filter for this provider (e.g. `debug`,
//!   `tfp_example=debug,reqwest=info`)
//! - `RUST_LOG`: consulted when `TFP_EXAMPLE_LOG` is unset
//!
//! Without either variable the level defaults to `info`.
//!
//! ```bash
//! TFP_EXAMPLE_LOG=tfp_example=debug ./tfp-example
//! ```

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Provider specific filter variable.
pub const LOG_ENV_VAR: &str = "TFP_EXAMPLE_LOG";

const DEFAULT_LEVEL: &str = "info";

/// Build the filter from `TFP_EXAMPLE_LOG`, then `RUST_LOG`, then `default_level`.
///
/// An unparsable directive falls through to the next source.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn subscriber_init(filter: EnvFilter) -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false),
        )
        .try_init()
}

/// Initialize logging at the default `info` level.
///
/// Does nothing if a global subscriber is already installed.
pub fn init_logging() {
    init_logging_with_default(DEFAULT_LEVEL);
}

/// Initialize logging with a custom default level, used when neither
/// environment variable is set.
pub fn init_logging_with_default(default_level: &str) {
    if subscriber_init(env_filter(default_level)).is_err() {
        eprintln!("tfp-example: a tracing subscriber is already installed");
    }
}

/// Try to initialize logging, returning false if already initialized.
pub fn try_init_logging() -> bool {
    subscriber_init(env_filter(DEFAULT_LEVEL)).is_ok()
}
