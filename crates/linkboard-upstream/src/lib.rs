//! Upstream client adapter for the linkboard arrivals service.
//!
//! Wraps the OneBusAway-style REST API of a single agency behind a typed
//! interface: list routes for the agency, list stop groupings for a route,
//! list arrivals for a stop. The adapter owns response-shape validation
//! (malformed payloads become [`UpstreamError::Protocol`] at this boundary
//! instead of leaking partial data downstream) and the retry policy for
//! transient failures.
//!
//! # Modules
//!
//! - [`client`] -- the HTTP client, URL construction and retry loop
//! - [`source`] -- the [`TransitSource`] seam the aggregation pipeline consumes
//! - [`error`] -- the transient/protocol error split
//! - `wire` -- typed response envelope, private to this crate

pub mod client;
pub mod error;
pub mod source;
mod wire;

pub use client::{ObaClient, ObaConfig};
pub use error::UpstreamError;
pub use source::{RouteStops, TransitSource};
