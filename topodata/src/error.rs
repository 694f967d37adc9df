use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TopodataError {
    #[error("invalid client parameters, {0}")]
    Builder(String),

    #[error("terrain service unreachable, {0}")]
    Transport(#[from] reqwest::Error),

    #[error("terrain service responded with {0}")]
    Status(StatusCode),

    #[error("malformed terrain service response, {0}")]
    MalformedResponse(String),
}

impl TopodataError {
    /// Returns `true` for failures talking to the service, as opposed
    /// to the service answering with something unusable.
    ///
    /// Timeouts are reported as transport failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status(_))
    }
}
