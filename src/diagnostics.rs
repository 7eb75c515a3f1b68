//! Fire-and-forget reporting for non-fatal faults.

use tracing::warn;

/// Sink for human-readable fault notes. Implementations must not block:
/// bring-up and the polling loop report through this and move on.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, message: &str);
}

/// Default sink: forwards to the `tracing` warn stream.
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, message: &str) {
        warn!(target: "diagnostics", "{message}");
    }
}

#[cfg(test)]
pub(crate) mod testsink {
    use super::DiagnosticSink;
    use std::sync::{Mutex, PoisonError};

    /// Collects notes so tests can assert on what was reported.
    #[derive(Default)]
    pub(crate) struct MemorySink {
        notes: Mutex<Vec<String>>,
    }

    impl MemorySink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn notes(&self) -> Vec<String> {
            self.notes
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    impl DiagnosticSink for MemorySink {
        fn report(&self, message: &str) {
            self.notes
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(message.to_string());
        }
    }
}
