//! Upstream-shaped transit records.
//!
//! These types mirror what the upstream API reports, after the adapter has
//! validated the response envelope and normalized sentinel values (empty
//! name strings, zero timestamps) into `Option`s. All timestamps are epoch
//! milliseconds UTC, matching the upstream representation.

use serde::{Deserialize, Serialize};

/// Vehicle-type code the upstream assigns to light-rail routes.
pub const LIGHT_RAIL: i32 = 0;

/// A transit route operated by the configured agency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Upstream route identifier (e.g. `40_100479`).
    pub id: String,
    /// Short display name. `None` when the upstream omits it or sends
    /// an empty string.
    pub short_name: Option<String>,
    /// Long display name. Same normalization as `short_name`.
    pub long_name: Option<String>,
    /// Vehicle-type code; see [`LIGHT_RAIL`].
    pub route_type: i32,
}

impl Route {
    /// Whether this route is classified as light rail.
    #[must_use]
    pub const fn is_light_rail(&self) -> bool {
        self.route_type == LIGHT_RAIL
    }

    /// Display name for the formatted board: the short name, falling back
    /// to the long name, falling back to `"Unknown"`.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.short_name
            .clone()
            .or_else(|| self.long_name.clone())
            .unwrap_or_else(|| String::from("Unknown"))
    }
}

/// A physical stop with its display metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    /// Upstream stop identifier.
    pub id: String,
    /// Human-readable stop name.
    pub name: String,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
}

/// A destination-oriented group of stops within a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopGroup {
    /// Destination name shown on the board (e.g. `Lynnwood City Center`).
    pub name: String,
    /// Ordered member stop identifiers, resolved against the route's stop
    /// reference table.
    pub stop_ids: Vec<String>,
}

/// One upstream partition of a route's stops into destination groups.
///
/// The upstream may report several groupings (by direction, by branch);
/// the aggregator only consumes the first one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopGrouping {
    /// The destination groups in this grouping, in upstream order.
    pub groups: Vec<StopGroup>,
}

/// A predicted or scheduled arrival for a `(stop, route)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrivalRecord {
    /// The route this arrival belongs to.
    pub route_id: String,
    /// Real-time predicted arrival, epoch milliseconds. `None` when the
    /// upstream has no prediction (it encodes that as `0`).
    pub predicted_arrival_time: Option<i64>,
    /// Scheduled arrival, epoch milliseconds.
    pub scheduled_arrival_time: Option<i64>,
}
