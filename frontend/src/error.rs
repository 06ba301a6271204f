use thiserror::Error;

/// Everything that can stop the viewer from coming up.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server answered with HTTP {0}")]
    Status(u16),
    #[error("invalid map config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no base URL to fetch the map config from")]
    NoOrigin,
    #[error("no element with id {0:?} to mount the map into")]
    MissingContainer(String),
    #[error("map script failed: {0}")]
    Script(String),
}
