// src/logging.rs
// =============================================================================
// Sets up `tracing` for the binary.
//
// Logs go to stderr: stdout carries nothing but the merged lines, so the
// output can be piped into sort/uniq without filtering.
//
// RUST_LOG wins when set; otherwise --verbose picks between info and debug.
// =============================================================================

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init(verbose: bool) {
    let default_filter = if verbose {
        "repo_lines=debug"
    } else {
        "repo_lines=info"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
