//! Test log output
//!
//! Honors `RUST_LOG`; output is captured per test.

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber once per test binary
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
