//! Logging setup
//!
//! Diagnostics go through `tracing` and are written to stderr so the
//! converted output on stdout stays clean. `REPO2TREE_LOG` takes precedence
//! over the verbosity flags.

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding an `EnvFilter` directive
pub const LOG_ENV: &str = "REPO2TREE_LOG";

/// Default filter directive for a `-v` count
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(format!("repo2tree={}", level_for(verbosity)))
    });

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
