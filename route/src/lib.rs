//! # Route elevation profiles
//!
//! `route` tracks, per conversation, an ordered list of waypoints
//! entered as `latitude, longitude` text, looks up the ground
//! elevation of each one, and reports every waypoint's height
//! relative to the first.
//!
//! Front ends talk to the crate only through [RouteCommands] and
//! render the returned [Reply] values.

mod coord;
mod elevation;
mod error;
pub mod format;
mod service;
mod session;
mod store;

pub use {
    crate::{
        coord::Coordinate,
        elevation::ElevationSource,
        error::RouteError,
        service::{Reply, RouteCommands, RouteService},
        session::{RouteSession, SessionState, Waypoint},
        store::{SessionId, SessionStore},
    },
    topodata,
};

#[cfg(test)]
pub(crate) mod testing;
