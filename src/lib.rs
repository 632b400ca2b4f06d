//! Probe fixtures for Linux tracer-detection tooling.
//!
//! Two small programs built from this crate poke different
//! debugger-attach code paths: `seize-tracer` builds a fork pair whose
//! members seize-trace each other (plus a self-trace request from the
//! root), and `trap-probe` checks whether a breakpoint trap still
//! reaches the process's own SIGTRAP handler.

use tracing_subscriber::EnvFilter;

pub mod options;
pub mod probe;
pub mod tracer;

/// Route diagnostics to stderr, gated by `RUST_LOG`.
///
/// Stdout is reserved for the one line a probe is allowed to print, so
/// the subscriber must never write there.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}
