//! Route aggregation: routes -> groupings -> batched per-stop resolution.
//!
//! One [`RouteAggregator::aggregate`] pass produces a complete
//! [`RouteBoard`] snapshot. Routes are walked sequentially to bound total
//! upstream load; the batch policy already fans out within each
//! destination group, and running groups or routes concurrently on top of
//! it would defeat the rate bound it exists to provide.

use std::collections::HashMap;

use chrono::Utc;
use tracing::{debug, warn};

use linkboard_types::{Destination, FormattedRoute, ResolvedStop, Route, RouteBoard, Stop};
use linkboard_upstream::{TransitSource, UpstreamError};

use crate::arrivals::next_arrival;
use crate::batch::{BatchPolicy, run_batched};
use crate::error::AggregateError;

/// Tunables for one aggregation pipeline.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Agency whose routes are aggregated.
    pub agency_id: String,
    /// Forward window, in minutes, for arrival requests.
    pub horizon_minutes: u32,
    /// Fan-out policy for per-stop arrival lookups.
    pub batch: BatchPolicy,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            agency_id: String::from("40"),
            horizon_minutes: 60,
            batch: BatchPolicy::default(),
        }
    }
}

/// Builds the formatted board from an upstream source.
#[derive(Debug)]
pub struct RouteAggregator<S> {
    source: S,
    config: AggregatorConfig,
}

impl<S: TransitSource + Sync> RouteAggregator<S> {
    /// Create an aggregator over `source`.
    pub const fn new(source: S, config: AggregatorConfig) -> Self {
        Self { source, config }
    }

    /// Aggregate the agency's light-rail routes into a board snapshot.
    ///
    /// Only a failure of the initial route listing is fatal. Everything
    /// downstream degrades locally: a route whose stop listing fails keeps
    /// zero destinations, an unknown stop id is skipped, and a stop whose
    /// arrival lookup fails stays on the board with no arrival.
    pub async fn aggregate(&self) -> Result<RouteBoard, AggregateError> {
        let routes = self
            .source
            .routes_for_agency(&self.config.agency_id)
            .await?;
        let light_rail: Vec<Route> = routes.into_iter().filter(Route::is_light_rail).collect();
        debug!(count = light_rail.len(), "light-rail routes retained");

        let mut board = RouteBoard::new();
        for route in light_rail {
            let formatted = self.format_route(&route).await;
            board.insert(route.id.clone(), formatted);
        }
        Ok(board)
    }

    async fn format_route(&self, route: &Route) -> FormattedRoute {
        let route_name = route.display_name();

        let route_stops = match self.source.stops_for_route(&route.id).await {
            Ok(listing) => listing,
            Err(e) => {
                warn!(route = %route.id, error = %e, "stop listing failed, route degrades to zero destinations");
                return FormattedRoute {
                    route_name,
                    destinations: Vec::new(),
                };
            }
        };

        let by_id: HashMap<&str, &Stop> = route_stops
            .stops
            .iter()
            .map(|stop| (stop.id.as_str(), stop))
            .collect();

        // Only the first grouping carries the destination partition.
        let groups = route_stops
            .groupings
            .first()
            .map(|grouping| grouping.groups.as_slice())
            .unwrap_or_default();

        let mut destinations = Vec::with_capacity(groups.len());
        for group in groups {
            // Unknown stop ids are dropped here, not nulled downstream.
            let members: Vec<Stop> = group
                .stop_ids
                .iter()
                .filter_map(|id| by_id.get(id.as_str()).map(|&stop| stop.clone()))
                .collect();

            let resolved = run_batched(members, &self.config.batch, |stop| {
                self.resolve_stop(&route.id, stop)
            })
            .await;

            destinations.push(Destination {
                destination: group.name.clone(),
                stops: resolved.into_iter().flatten().collect(),
            });
        }

        FormattedRoute {
            route_name,
            destinations,
        }
    }

    /// Resolve one stop's next arrival. An arrival-fetch failure is
    /// absorbed into an absent arrival so the stop stays on the board.
    async fn resolve_stop(
        &self,
        route_id: &str,
        stop: Stop,
    ) -> Result<ResolvedStop, UpstreamError> {
        let next = match self
            .source
            .arrivals_for_stop(&stop.id, self.config.horizon_minutes)
            .await
        {
            Ok(records) => next_arrival(&records, route_id, Utc::now().timestamp_millis()),
            Err(e) => {
                warn!(stop = %stop.id, error = %e, "arrival lookup failed, leaving arrival absent");
                None
            }
        };

        Ok(ResolvedStop {
            name: stop.name,
            lat: stop.lat,
            lon: stop.lon,
            next_arrival: next,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::{HashMap, HashSet};
    use std::time::Duration;

    use linkboard_types::{ArrivalRecord, StopGroup, StopGrouping};
    use linkboard_upstream::RouteStops;

    use super::*;

    /// Scripted in-memory source for pipeline tests.
    #[derive(Default)]
    struct ScriptedSource {
        routes: Vec<Route>,
        fail_route_listing: bool,
        route_stops: HashMap<String, RouteStops>,
        fail_stops_for: HashSet<String>,
        arrivals: HashMap<String, Vec<ArrivalRecord>>,
        fail_arrivals_for: HashSet<String>,
    }

    impl TransitSource for ScriptedSource {
        async fn routes_for_agency(&self, _agency_id: &str) -> Result<Vec<Route>, UpstreamError> {
            if self.fail_route_listing {
                return Err(UpstreamError::Transient(String::from("listing down")));
            }
            Ok(self.routes.clone())
        }

        async fn stops_for_route(&self, route_id: &str) -> Result<RouteStops, UpstreamError> {
            if self.fail_stops_for.contains(route_id) {
                return Err(UpstreamError::Transient(String::from("stops down")));
            }
            Ok(self.route_stops.get(route_id).cloned().unwrap_or_default())
        }

        async fn arrivals_for_stop(
            &self,
            stop_id: &str,
            _horizon_minutes: u32,
        ) -> Result<Vec<ArrivalRecord>, UpstreamError> {
            if self.fail_arrivals_for.contains(stop_id) {
                return Err(UpstreamError::Transient(String::from("arrivals down")));
            }
            Ok(self.arrivals.get(stop_id).cloned().unwrap_or_default())
        }
    }

    fn quick_config() -> AggregatorConfig {
        AggregatorConfig {
            agency_id: String::from("40"),
            horizon_minutes: 60,
            batch: BatchPolicy {
                width: 5,
                delay: Duration::ZERO,
            },
        }
    }

    fn route(id: &str, short_name: &str, route_type: i32) -> Route {
        Route {
            id: String::from(id),
            short_name: Some(String::from(short_name)),
            long_name: None,
            route_type,
        }
    }

    fn stop(id: &str, name: &str) -> Stop {
        Stop {
            id: String::from(id),
            name: String::from(name),
            lat: 47.6,
            lon: -122.3,
        }
    }

    fn grouping(destination: &str, stop_ids: &[&str]) -> Vec<StopGrouping> {
        vec![StopGrouping {
            groups: vec![StopGroup {
                name: String::from(destination),
                stop_ids: stop_ids.iter().map(|s| String::from(*s)).collect(),
            }],
        }]
    }

    #[tokio::test]
    async fn retains_only_light_rail_routes_in_order() {
        let source = ScriptedSource {
            routes: vec![
                route("40_01", "1 Line", 0),
                route("40_02", "2 Line", 0),
                route("40_03", "Bus 3", 3),
                route("40_04", "Sounder", 2),
                route("40_05", "3 Line", 0),
            ],
            ..ScriptedSource::default()
        };
        let aggregator = RouteAggregator::new(source, quick_config());

        let board = aggregator.aggregate().await.unwrap();
        let keys: Vec<&String> = board.keys().collect();
        assert_eq!(keys, vec!["40_01", "40_02", "40_05"]);
    }

    #[tokio::test]
    async fn route_listing_failure_aborts_the_pass() {
        let source = ScriptedSource {
            fail_route_listing: true,
            ..ScriptedSource::default()
        };
        let aggregator = RouteAggregator::new(source, quick_config());

        let result = aggregator.aggregate().await;
        assert!(matches!(result, Err(AggregateError::RouteListing(_))));
    }

    #[tokio::test]
    async fn stop_listing_failure_degrades_to_zero_destinations() {
        let source = ScriptedSource {
            routes: vec![route("40_01", "1 Line", 0)],
            fail_stops_for: HashSet::from([String::from("40_01")]),
            ..ScriptedSource::default()
        };
        let aggregator = RouteAggregator::new(source, quick_config());

        let board = aggregator.aggregate().await.unwrap();
        let formatted = board.get("40_01").unwrap();
        assert_eq!(formatted.route_name, "1 Line");
        assert!(formatted.destinations.is_empty());
    }

    #[tokio::test]
    async fn missing_grouping_data_yields_zero_destinations() {
        let source = ScriptedSource {
            routes: vec![route("40_01", "1 Line", 0)],
            route_stops: HashMap::from([(
                String::from("40_01"),
                RouteStops {
                    groupings: Vec::new(),
                    stops: vec![stop("s1", "Westlake")],
                },
            )]),
            ..ScriptedSource::default()
        };
        let aggregator = RouteAggregator::new(source, quick_config());

        let board = aggregator.aggregate().await.unwrap();
        assert!(board.get("40_01").unwrap().destinations.is_empty());
    }

    #[tokio::test]
    async fn unknown_stop_ids_are_skipped() {
        let source = ScriptedSource {
            routes: vec![route("40_01", "1 Line", 0)],
            route_stops: HashMap::from([(
                String::from("40_01"),
                RouteStops {
                    groupings: grouping("Angle Lake", &["s1", "ghost"]),
                    stops: vec![stop("s1", "Westlake")],
                },
            )]),
            ..ScriptedSource::default()
        };
        let aggregator = RouteAggregator::new(source, quick_config());

        let board = aggregator.aggregate().await.unwrap();
        let destination = board.get("40_01").unwrap().destinations.first().unwrap();
        assert_eq!(destination.stops.len(), 1);
        assert_eq!(destination.stops.first().unwrap().name, "Westlake");
    }

    #[tokio::test]
    async fn arrival_failure_keeps_the_stop_with_absent_arrival() {
        let t5 = Utc::now().timestamp_millis() + 5 * 60_000;
        let source = ScriptedSource {
            routes: vec![route("40_01", "1 Line", 0)],
            route_stops: HashMap::from([(
                String::from("40_01"),
                RouteStops {
                    groupings: grouping("Angle Lake", &["s1", "s2"]),
                    stops: vec![stop("s1", "Westlake"), stop("s2", "Pioneer Square")],
                },
            )]),
            arrivals: HashMap::from([(
                String::from("s2"),
                vec![ArrivalRecord {
                    route_id: String::from("40_01"),
                    predicted_arrival_time: Some(t5),
                    scheduled_arrival_time: None,
                }],
            )]),
            fail_arrivals_for: HashSet::from([String::from("s1")]),
            ..ScriptedSource::default()
        };
        let aggregator = RouteAggregator::new(source, quick_config());

        let board = aggregator.aggregate().await.unwrap();
        let destination = board.get("40_01").unwrap().destinations.first().unwrap();

        // The failed stop stays on the board, and its neighbor is intact.
        assert_eq!(destination.stops.len(), 2);
        assert_eq!(destination.stops.first().unwrap().next_arrival, None);
        assert_eq!(destination.stops.get(1).unwrap().next_arrival, Some(t5));
    }

    #[tokio::test]
    async fn end_to_end_two_routes_with_mixed_arrivals() {
        let now = Utc::now().timestamp_millis();
        let t5 = now + 5 * 60_000;
        let t10 = now + 10 * 60_000;

        let source = ScriptedSource {
            routes: vec![route("40_a", "1 Line", 0), route("40_b", "2 Line", 0)],
            route_stops: HashMap::from([
                (
                    String::from("40_a"),
                    RouteStops {
                        groupings: grouping("Angle Lake", &["s1", "s2"]),
                        stops: vec![stop("s1", "Westlake"), stop("s2", "Pioneer Square")],
                    },
                ),
                (
                    String::from("40_b"),
                    RouteStops {
                        groupings: Vec::new(),
                        stops: Vec::new(),
                    },
                ),
            ]),
            arrivals: HashMap::from([(
                String::from("s1"),
                vec![
                    ArrivalRecord {
                        route_id: String::from("40_a"),
                        predicted_arrival_time: Some(t10),
                        scheduled_arrival_time: Some(t5),
                    },
                    // Another route's arrival at the same platform; ignored.
                    ArrivalRecord {
                        route_id: String::from("40_z"),
                        predicted_arrival_time: Some(now + 60_000),
                        scheduled_arrival_time: None,
                    },
                ],
            )]),
            ..ScriptedSource::default()
        };
        let aggregator = RouteAggregator::new(source, quick_config());

        let board = aggregator.aggregate().await.unwrap();
        assert_eq!(board.len(), 2);

        let route_a = board.get("40_a").unwrap();
        assert_eq!(route_a.route_name, "1 Line");
        let destination = route_a.destinations.first().unwrap();
        assert_eq!(destination.destination, "Angle Lake");

        let s1 = destination.stops.first().unwrap();
        assert_eq!(s1.name, "Westlake");
        assert_eq!(s1.next_arrival, Some(t5), "scheduled time is the earlier candidate");

        let s2 = destination.stops.get(1).unwrap();
        assert_eq!(s2.name, "Pioneer Square");
        assert_eq!(s2.next_arrival, None);

        assert!(board.get("40_b").unwrap().destinations.is_empty());
    }
}
