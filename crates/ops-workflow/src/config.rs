//! Harness configuration.

use std::time::Duration;

/// Default number of in-flight requests in concurrent mode.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 8;

/// How requests are handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionMode {
    /// One request at a time, in issuance order.
    #[default]
    Sequential,
    /// Requests are spawned in issuance order with at most `max_in_flight`
    /// outstanding. Completion order is unspecified.
    Concurrent {
        /// Upper bound on outstanding requests. Zero is treated as one.
        max_in_flight: usize,
    },
}

impl SubmissionMode {
    /// Concurrent mode with the given bound.
    #[must_use]
    pub const fn concurrent(max_in_flight: usize) -> Self {
        Self::Concurrent { max_in_flight }
    }
}

/// Configuration for a [`crate::BatchHarness`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HarnessConfig {
    /// Submission strategy.
    pub mode: SubmissionMode,
    /// Limit on a single invocation. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl HarnessConfig {
    /// Sequential submission, no timeout.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: SubmissionMode::Sequential,
            request_timeout: None,
        }
    }

    /// Set the submission mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: SubmissionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sequential_without_timeout() {
        let config = HarnessConfig::default();
        assert_eq!(config, HarnessConfig::new());
        assert_eq!(config.mode, SubmissionMode::Sequential);
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn builder_sets_fields() {
        let config = HarnessConfig::new()
            .with_mode(SubmissionMode::concurrent(DEFAULT_MAX_IN_FLIGHT))
            .with_request_timeout(Duration::from_secs(5));

        assert_eq!(config.mode, SubmissionMode::Concurrent { max_in_flight: 8 });
        assert_eq!(config.request_timeout, Some(Duration::from_secs(5)));
    }
}
