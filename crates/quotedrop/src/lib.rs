pub mod app;
pub mod cli;
pub mod domain;
pub mod infra;

/// Install the global tracing subscriber used by the binary. Diagnostics go
/// to stderr so delivered output can be piped cleanly.
pub fn init() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
}
