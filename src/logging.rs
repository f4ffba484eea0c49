//! Structured logging setup
//!
//! Diagnostics go to stderr through `tracing`; answers stay on stdout.
//! `RUST_LOG` overrides the level derived from the CLI flags.

use tracing_subscriber::EnvFilter;

use crate::cli::Verbosity;

/// Default filter directive for a verbosity level
pub fn default_directive(verbosity: Verbosity) -> &'static str {
    match verbosity {
        Verbosity::Quiet => "error",
        Verbosity::Normal => "warn",
        Verbosity::Verbose => "ragbuddy=info",
        Verbosity::VeryVerbose => "ragbuddy=debug",
    }
}

/// Install the global subscriber; later calls are no-ops
pub fn init(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(matches!(verbosity, Verbosity::VeryVerbose))
        .try_init();
}
