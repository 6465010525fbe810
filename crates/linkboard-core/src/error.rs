//! Error types for the aggregation pipeline.

use linkboard_upstream::UpstreamError;

/// Errors that abort an aggregation pass outright.
///
/// Everything below the initial route listing degrades locally instead of
/// surfacing here; see the module docs on [`aggregate`](crate::aggregate).
#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    /// The initial route listing failed, so there is nothing to build from.
    #[error("route listing failed: {0}")]
    RouteListing(#[from] UpstreamError),
}
