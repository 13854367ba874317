//! Tracing subscriber setup for binaries embedding the pipeline

use tracing_subscriber::Layer;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter};

/// Initialize a stderr tracing subscriber filtered by `RUST_LOG`.
///
/// Call once near process start; library code only emits events and never
/// installs a subscriber on its own.
pub fn init_tracing_subscriber() {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_default_env());

    tracing_subscriber::registry().with(console_layer).init();
}
