// crates/test-utils/src/lib.rs

//! Shared helpers for taskdag's integration tests: spec builders, recording
//! collaborators and concurrency probes.

pub mod builders;
pub mod probes;

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialise a compact tracing subscriber once per test binary.
///
/// Honours `TASKDAG_LOG`; defaults to `warn` so passing tests stay quiet.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_env("TASKDAG_LOG")
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
