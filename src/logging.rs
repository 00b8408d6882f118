//! Tracing setup for the CLI.
//!
//! Diagnostics go to stderr so the interactive session output on stdout
//! stays clean. `RUST_LOG` overrides the level selected by `--verbose`.

use tracing_subscriber::EnvFilter;

pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
