//! Shared type definitions for the linkboard arrivals service.
//!
//! This crate is the single source of truth for the types that flow through
//! the aggregation pipeline: the upstream-shaped transit records and the
//! formatted board served over HTTP. The serde renames on the board types
//! define the JSON wire shape in one place, so the HTTP surface and the
//! external cache always agree on it.
//!
//! # Modules
//!
//! - [`transit`] -- upstream records (routes, stops, groupings, arrivals)
//! - [`board`] -- the aggregated output tree (the cached snapshot unit)

pub mod board;
pub mod transit;

pub use board::{Destination, FormattedRoute, ResolvedStop, RouteBoard};
pub use transit::{ArrivalRecord, LIGHT_RAIL, Route, Stop, StopGroup, StopGrouping};
