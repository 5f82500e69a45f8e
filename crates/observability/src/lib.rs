//! Tracing/logging setup shared by binaries and tests.

/// Initialize process-wide tracing with JSON output and `RUST_LOG` filtering.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(&tracing::LogConfig::default());
}

/// Initialize process-wide tracing with an explicit configuration.
pub fn init_with(config: &tracing::LogConfig) {
    tracing::init(config);
}

/// Tracing configuration (filters, formats).
pub mod tracing;

pub use crate::tracing::{LogConfig, LogFormat};
