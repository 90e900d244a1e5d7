//! Tracing subscriber setup for the CLI.
//!
//! Logs go to stderr so stdout stays pipeable. The level comes from
//! `CCRAFT_LOG` (default `warn`); `--verbose` forces `debug`.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "CCRAFT_LOG";

pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // A second init (e.g. in tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
