use crate::{Coordinate, ElevationSource, RouteError};
use log::debug;

/// Which input a session expects next.
///
/// ```text
/// Idle --begin_route--> AwaitingStart --coordinate--> Idle
/// Idle --request_next--> AwaitingNext --coordinate--> Idle
/// ```
///
/// A failed coordinate leaves the session in its waiting state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    AwaitingStart,
    AwaitingNext,
}

/// One recorded point of a route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub coordinate: Coordinate,

    /// Ground elevation in meters.
    pub elevation_m: f64,

    /// `elevation_m` minus the route's first elevation; exactly `0.0`
    /// for the first waypoint.
    pub delta_m: f64,
}

/// Waypoints and input state for one conversation.
#[derive(Debug, Default)]
pub struct RouteSession {
    waypoints: Vec<Waypoint>,
    state: SessionState,
}

impl RouteSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Discards the current route and waits for a start point.
    pub fn begin_route(&mut self) {
        debug!(
            "begin route; dropping {} waypoints, was {:?}",
            self.waypoints.len(),
            self.state
        );
        self.waypoints.clear();
        self.state = SessionState::AwaitingStart;
    }

    /// Waits for another point of an already started route.
    pub fn request_next(&mut self) -> Result<(), RouteError> {
        if self.waypoints.is_empty() {
            return Err(RouteError::RouteNotStarted);
        }
        self.state = SessionState::AwaitingNext;
        Ok(())
    }

    /// Parses `text`, looks up its elevation, and appends the
    /// resulting waypoint.
    ///
    /// Nothing changes unless both steps succeed, so the caller can
    /// simply ask for the coordinate again.
    pub async fn supply_coordinate<E>(
        &mut self,
        text: &str,
        elevation: &E,
    ) -> Result<Waypoint, RouteError>
    where
        E: ElevationSource + ?Sized,
    {
        let base_m = match self.state {
            SessionState::Idle => return Err(RouteError::InvalidState(self.state)),
            SessionState::AwaitingStart => None,
            SessionState::AwaitingNext => Some(
                self.waypoints
                    .first()
                    .map(|first| first.elevation_m)
                    .ok_or(RouteError::RouteNotStarted)?,
            ),
        };

        let coordinate = Coordinate::parse(text)?;
        let elevation_m = elevation.elevation(coordinate).await?;

        let waypoint = Waypoint {
            coordinate,
            elevation_m,
            delta_m: base_m.map_or(0.0, |base_m| elevation_m - base_m),
        };
        if base_m.is_none() {
            self.waypoints.clear();
        }
        self.waypoints.push(waypoint);
        debug!(
            "waypoint {}; {coordinate}, elevation: {elevation_m}, delta: {}",
            self.waypoints.len(),
            waypoint.delta_m
        );
        self.state = SessionState::Idle;
        Ok(waypoint)
    }

    /// Returns the route so far, first waypoint first.
    pub fn profile(&self) -> &[Waypoint] {
        &self.waypoints
    }
}


#[cfg(test)]
mod proptests {
    use super::RouteSession;
    use crate::testing::Scripted;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_deltas_follow_first_elevation(
            elevations in proptest::collection::vec(-500.0..9000.0f64, 1..20),
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();
            let source = Scripted::elevations(elevations.clone());
            let mut session = RouteSession::new();
            runtime.block_on(async {
                session.begin_route();
                session.supply_coordinate("10,10", &source).await.unwrap();
                for _ in 1..elevations.len() {
                    session.request_next().unwrap();
                    session.supply_coordinate("10.5,10.5", &source).await.unwrap();
                }
            });

            let profile = session.profile();
            prop_assert_eq!(profile.len(), elevations.len());
            prop_assert_eq!(profile[0].delta_m, 0.0);
            for (waypoint, elevation) in profile.iter().zip(&elevations) {
                prop_assert_eq!(waypoint.elevation_m, *elevation);
                prop_assert_eq!(waypoint.delta_m, elevation - elevations[0]);
            }
        }
    }
}
