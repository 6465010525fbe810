//! Error types for the upstream client adapter.
//!
//! The adapter collapses every failure into two cases: transient faults
//! the retry policy may re-attempt, and protocol faults it must not.

/// Errors surfaced by upstream API calls.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// Network failure or an upstream 5xx. Retried automatically up to the
    /// configured bound before being surfaced.
    #[error("transient upstream error: {0}")]
    Transient(String),

    /// The response did not match the documented shape (unexpected status,
    /// undecodable body, or a non-OK envelope code). Never retried.
    #[error("upstream protocol error: {0}")]
    Protocol(String),
}

impl UpstreamError {
    /// Whether the retry policy should re-attempt the call.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transient_errors_are_retryable() {
        assert!(UpstreamError::Transient(String::from("timeout")).is_transient());
        assert!(!UpstreamError::Protocol(String::from("bad shape")).is_transient());
    }
}
