use crate::{
    format, ElevationSource, RouteError, SessionId, SessionState, SessionStore, Waypoint,
};
use async_trait::async_trait;
use log::{debug, warn};
use std::fmt;

/// What a front end should show the user after an operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// A new route was started; waiting for its first point.
    RouteStarted,

    /// Waiting for the next point of the current route.
    AwaitingNextPoint,

    /// The user asked for a next point before starting a route.
    RouteNotStarted,

    StartPointSet(Waypoint),

    PointAdded(Waypoint),

    /// The coordinate could not be parsed or its elevation could not
    /// be looked up. The session still waits for a coordinate.
    InvalidCoordinate,

    /// The route so far; empty if no route was started.
    Profile(Vec<Waypoint>),
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RouteStarted => f.write_str(format::START_PROMPT),
            Self::AwaitingNextPoint => f.write_str(format::NEXT_PROMPT),
            Self::RouteNotStarted => f.write_str(&format::route_not_started()),
            Self::StartPointSet(waypoint) => f.write_str(&format::start_point(waypoint)),
            Self::PointAdded(waypoint) => f.write_str(&format::next_point(waypoint)),
            Self::InvalidCoordinate => f.write_str(format::INVALID_COORDINATE),
            Self::Profile(waypoints) => f.write_str(&format::profile(waypoints)),
        }
    }
}

/// The operations a front end may invoke on behalf of a
/// conversation.
#[async_trait]
pub trait RouteCommands: Send + Sync {
    /// Starts a new route, discarding any previous one.
    async fn start_route(&self, id: &SessionId) -> Reply;

    /// Asks for another point of the current route.
    async fn advance_route(&self, id: &SessionId) -> Reply;

    async fn show_profile(&self, id: &SessionId) -> Reply;

    /// Feeds coordinate text to a session waiting for one.
    ///
    /// Bad input and elevation lookup failures are answered with
    /// [Reply::InvalidCoordinate]. The only error is
    /// [RouteError::InvalidState], returned when the session isn't
    /// waiting for a coordinate.
    async fn supply_coordinate(&self, id: &SessionId, text: &str) -> Result<Reply, RouteError>;

    /// Returns `true` if the session's next text should be a
    /// coordinate.
    async fn awaiting_coordinate(&self, id: &SessionId) -> bool;
}

pub struct RouteService<E> {
    sessions: SessionStore,
    elevation: E,
}

impl<E> RouteService<E> {
    pub fn new(elevation: E) -> Self {
        Self {
            sessions: SessionStore::new(),
            elevation,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}

#[async_trait]
impl<E> RouteCommands for RouteService<E>
where
    E: ElevationSource,
{
    async fn start_route(&self, id: &SessionId) -> Reply {
        let session = self.sessions.session(id);
        session.lock().await.begin_route();
        debug!("{id}: route started");
        Reply::RouteStarted
    }

    async fn advance_route(&self, id: &SessionId) -> Reply {
        let session = self.sessions.session(id);
        let result = session.lock().await.request_next();
        match result {
            Ok(()) => Reply::AwaitingNextPoint,
            Err(_) => {
                debug!("{id}: next point requested before start");
                Reply::RouteNotStarted
            }
        }
    }

    async fn show_profile(&self, id: &SessionId) -> Reply {
        let session = self.sessions.session(id);
        let waypoints = session.lock().await.profile().to_vec();
        Reply::Profile(waypoints)
    }

    async fn supply_coordinate(&self, id: &SessionId, text: &str) -> Result<Reply, RouteError> {
        let session = self.sessions.session(id);
        let mut session = session.lock().await;
        let is_start = session.state() == SessionState::AwaitingStart;
        match session.supply_coordinate(text, &self.elevation).await {
            Ok(waypoint) if is_start => Ok(Reply::StartPointSet(waypoint)),
            Ok(waypoint) => Ok(Reply::PointAdded(waypoint)),
            Err(RouteError::MalformedInput(input)) => {
                debug!("{id}: rejected coordinate {input:?}");
                Ok(Reply::InvalidCoordinate)
            }
            Err(RouteError::Elevation(e)) if e.is_transport() => {
                warn!("{id}: elevation lookup failed, {e}");
                Ok(Reply::InvalidCoordinate)
            }
            Err(RouteError::Elevation(e)) => {
                warn!("{id}: terrain service misbehaving, {e}");
                Ok(Reply::InvalidCoordinate)
            }
            Err(e) => Err(e),
        }
    }

    async fn awaiting_coordinate(&self, id: &SessionId) -> bool {
        let session = self.sessions.session(id);
        let state = session.lock().await.state();
        state != SessionState::Idle
    }
}
