//! The read interface the aggregation pipeline consumes.
//!
//! [`TransitSource`] is the seam between the pipeline and the network:
//! production code plugs in [`ObaClient`](crate::ObaClient), test suites
//! plug in scripted sources. The methods return `Send` futures so callers
//! remain usable from multi-threaded executors without boxing.

use std::future::Future;

use linkboard_types::{ArrivalRecord, Route, Stop, StopGrouping};

use crate::error::UpstreamError;

/// Stop groupings and the stop reference table for one route.
///
/// The reference table (`stops`) resolves the identifiers listed inside the
/// groupings; identifiers with no reference entry are unknown to the route.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RouteStops {
    /// Upstream groupings, in upstream order. The aggregator consumes only
    /// the first one.
    pub groupings: Vec<StopGrouping>,
    /// Every stop the route references.
    pub stops: Vec<Stop>,
}

/// Read operations against the upstream transit API.
pub trait TransitSource {
    /// List every route the agency operates.
    fn routes_for_agency(
        &self,
        agency_id: &str,
    ) -> impl Future<Output = Result<Vec<Route>, UpstreamError>> + Send;

    /// List the stop groupings and stop reference table for a route.
    fn stops_for_route(
        &self,
        route_id: &str,
    ) -> impl Future<Output = Result<RouteStops, UpstreamError>> + Send;

    /// List arrivals at a stop within the next `horizon_minutes`.
    fn arrivals_for_stop(
        &self,
        stop_id: &str,
        horizon_minutes: u32,
    ) -> impl Future<Output = Result<Vec<ArrivalRecord>, UpstreamError>> + Send;
}
