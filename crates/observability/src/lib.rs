//! Process-wide logging setup, shared by the binary and anything that wants
//! the same subscriber in tests.

/// Install the tracing subscriber for this process.
///
/// Calling it again after a successful install is a no-op.
pub fn init() {
    tracing::init();
}

/// Subscriber construction (filter, output format).
pub mod tracing;
