use crate::SessionState;
use thiserror::Error;
use topodata::TopodataError;

#[derive(Error, Debug)]
pub enum RouteError {
    #[error("malformed coordinate input {0:?}")]
    MalformedInput(String),

    #[error("{0}")]
    Elevation(#[from] TopodataError),

    #[error("route not started")]
    RouteNotStarted,

    #[error("no coordinate expected while {0:?}")]
    InvalidState(SessionState),
}
