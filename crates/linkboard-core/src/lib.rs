//! Aggregation pipeline for the linkboard arrivals service.
//!
//! Turns the upstream's flat route/stop/arrival listings into the nested
//! board the HTTP surface serves. Three pieces compose:
//!
//! - [`batch`] -- chunked concurrent fan-out with an inter-chunk pause, so
//!   per-stop lookups respect the upstream's implicit rate limits
//! - [`arrivals`] -- pure selection of the soonest future arrival
//! - [`aggregate`] -- the orchestration that walks routes, groupings and
//!   stops and assembles the [`RouteBoard`](linkboard_types::RouteBoard)
//!
//! Failure policy: only the initial route listing can abort a pass. Every
//! later fault degrades the output locally and is logged, never propagated.

pub mod aggregate;
pub mod arrivals;
pub mod batch;
pub mod error;

pub use aggregate::{AggregatorConfig, RouteAggregator};
pub use arrivals::next_arrival;
pub use batch::{BatchPolicy, run_batched};
pub use error::AggregateError;
