//! HTTP front for the linkboard arrivals service.
//!
//! One read endpoint, `GET /routes`, serving the aggregated light-rail
//! board through the snapshot cache. The router carries permissive CORS
//! for browser dashboards plus no-store headers so intermediaries never
//! cache a stale board on top of the internal data cache.
//!
//! # Modules
//!
//! - [`config`] -- environment-variable configuration
//! - [`state`] -- shared application state (aggregator + cache)
//! - [`handlers`] -- endpoint handlers
//! - [`router`] -- router and middleware assembly
//! - [`server`] -- bind/serve lifecycle
//! - [`error`] -- request-level error mapping

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
