//! Typed response envelope for the upstream API.
//!
//! Every endpoint wraps its payload in `{ code, data }`. The structs here
//! mirror the upstream field names exactly; the `From` conversions at the
//! bottom produce the crate's domain types and normalize the upstream's
//! sentinel values: empty-string route names and non-positive timestamps
//! both become `None`. A payload that fails these shapes is a protocol
//! error, decided in [`client`](crate::client).
//!
//! Collections the upstream may omit entirely (groupings, references,
//! arrivals) default to empty rather than failing the decode; absent
//! grouping data means a route with zero destinations, not a dead request.

use serde::Deserialize;

use linkboard_types::{ArrivalRecord, Route, Stop, StopGroup, StopGrouping};

use crate::source::RouteStops;

/// The `{ code, data }` wrapper common to all endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub code: i32,
    pub data: T,
}

// ---------------------------------------------------------------------------
// routes-for-agency
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RouteListData {
    #[serde(default)]
    pub list: Vec<RouteDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RouteDto {
    pub id: String,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub long_name: Option<String>,
    #[serde(rename = "type")]
    pub route_type: i32,
}

// ---------------------------------------------------------------------------
// stops-for-route
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StopsForRouteData {
    pub entry: StopsForRouteEntry,
    #[serde(default)]
    pub references: References,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StopsForRouteEntry {
    #[serde(default)]
    pub stop_groupings: Vec<StopGroupingDto>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct References {
    #[serde(default)]
    pub stops: Vec<StopDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StopGroupingDto {
    #[serde(default)]
    pub stop_groups: Vec<StopGroupDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StopGroupDto {
    #[serde(default)]
    pub name: GroupNameDto,
    #[serde(default)]
    pub stop_ids: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GroupNameDto {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StopDto {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

// ---------------------------------------------------------------------------
// arrivals-and-departures-for-stop
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ArrivalsData {
    pub entry: ArrivalsEntry,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ArrivalsEntry {
    #[serde(default)]
    pub arrivals_and_departures: Vec<ArrivalDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ArrivalDto {
    pub route_id: String,
    #[serde(default)]
    pub predicted_arrival_time: Option<i64>,
    #[serde(default)]
    pub scheduled_arrival_time: Option<i64>,
}

// ---------------------------------------------------------------------------
// Conversions into domain types
// ---------------------------------------------------------------------------

/// Empty strings mean "not set" upstream.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// The upstream encodes "no prediction" as `0`.
fn positive(value: Option<i64>) -> Option<i64> {
    value.filter(|&t| t > 0)
}

impl From<RouteDto> for Route {
    fn from(dto: RouteDto) -> Self {
        Self {
            id: dto.id,
            short_name: non_empty(dto.short_name),
            long_name: non_empty(dto.long_name),
            route_type: dto.route_type,
        }
    }
}

impl From<StopDto> for Stop {
    fn from(dto: StopDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            lat: dto.lat,
            lon: dto.lon,
        }
    }
}

impl From<StopGroupDto> for StopGroup {
    fn from(dto: StopGroupDto) -> Self {
        Self {
            name: dto.name.name,
            stop_ids: dto.stop_ids,
        }
    }
}

impl From<StopGroupingDto> for StopGrouping {
    fn from(dto: StopGroupingDto) -> Self {
        Self {
            groups: dto.stop_groups.into_iter().map(StopGroup::from).collect(),
        }
    }
}

impl From<StopsForRouteData> for RouteStops {
    fn from(data: StopsForRouteData) -> Self {
        Self {
            groupings: data
                .entry
                .stop_groupings
                .into_iter()
                .map(StopGrouping::from)
                .collect(),
            stops: data.references.stops.into_iter().map(Stop::from).collect(),
        }
    }
}

impl From<ArrivalDto> for ArrivalRecord {
    fn from(dto: ArrivalDto) -> Self {
        Self {
            route_id: dto.route_id,
            predicted_arrival_time: positive(dto.predicted_arrival_time),
            scheduled_arrival_time: positive(dto.scheduled_arrival_time),
        }
    }
}
