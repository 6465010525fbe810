//! The aggregated output tree: route -> destination -> stop, annotated
//! with next-arrival predictions.
//!
//! These types are the snapshot unit the cache layer stores and the HTTP
//! surface serves. The camelCase serde renames define the wire shape:
//!
//! ```json
//! {
//!   "40_100479": {
//!     "routeName": "1 Line",
//!     "destinations": [
//!       { "destination": "Lynnwood City Center",
//!         "stops": [ { "name": "...", "lat": 47.6, "lon": -122.3,
//!                      "nextArrival": 1721324400000 } ] }
//!     ]
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A stop on the board with its single soonest future arrival, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStop {
    /// Human-readable stop name.
    pub name: String,
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
    /// Earliest valid future arrival for the route in question, epoch
    /// milliseconds. `None` when no arrival qualifies (or the lookup
    /// degraded).
    pub next_arrival: Option<i64>,
}

/// One destination group with its resolved stops.
///
/// Stops whose identifiers could not be resolved against the route's
/// reference table are dropped here, not nulled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    /// Destination name (e.g. `Angle Lake`).
    pub destination: String,
    /// Resolved stops in upstream order.
    pub stops: Vec<ResolvedStop>,
}

/// A fully formatted route entry on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedRoute {
    /// Route display name (short name, else long name, else `Unknown`).
    pub route_name: String,
    /// Destination groups in upstream order.
    pub destinations: Vec<Destination>,
}

/// The complete aggregated snapshot, keyed by route identifier.
///
/// Produced wholesale by one aggregation pass and replaced wholesale by
/// the next; the cache never merges two boards.
pub type RouteBoard = BTreeMap<String, FormattedRoute>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_serializes_with_camel_case_keys() {
        let mut board = RouteBoard::new();
        board.insert(
            String::from("40_1"),
            FormattedRoute {
                route_name: String::from("1 Line"),
                destinations: vec![Destination {
                    destination: String::from("Angle Lake"),
                    stops: vec![ResolvedStop {
                        name: String::from("Westlake"),
                        lat: 47.611,
                        lon: -122.337,
                        next_arrival: Some(1_721_324_400_000),
                    }],
                }],
            },
        );

        let json = serde_json::to_value(&board).unwrap_or_default();
        assert_eq!(json["40_1"]["routeName"], "1 Line");
        assert_eq!(json["40_1"]["destinations"][0]["destination"], "Angle Lake");
        assert_eq!(
            json["40_1"]["destinations"][0]["stops"][0]["nextArrival"],
            1_721_324_400_000_i64
        );
    }

    #[test]
    fn missing_arrival_serializes_as_null() {
        let stop = ResolvedStop {
            name: String::from("Pioneer Square"),
            lat: 47.603,
            lon: -122.331,
            next_arrival: None,
        };
        let json = serde_json::to_value(&stop).unwrap_or_default();
        assert!(json["nextArrival"].is_null());
    }

    #[test]
    fn board_round_trips_through_json() {
        let mut board = RouteBoard::new();
        board.insert(
            String::from("40_2"),
            FormattedRoute {
                route_name: String::from("2 Line"),
                destinations: Vec::new(),
            },
        );

        let text = serde_json::to_string(&board).unwrap_or_default();
        let back: RouteBoard = serde_json::from_str(&text).unwrap_or_default();
        assert_eq!(back, board);
    }
}
