use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Coordinate outside projection domain: {0}")]
    Domain(String),

    #[error("No convergence: {0}")]
    Convergence(String),

    #[error("Initialization for {0} not yet complete")]
    NotReady(String),

    #[error("Unsupported datum: {0}")]
    UnsupportedDatum(String),

    #[error("Resource error: {0}")]
    Resource(String),
}

impl ProjError {
    pub(crate) fn convergence(what: &str) -> Self {
        ProjError::Convergence(format!("{what} failed to converge"))
    }
}

/// Failure reported by a host [`ResourceFetcher`](crate::resolver::ResourceFetcher).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Fetching {url} failed: {reason}")]
    Transport { url: String, reason: String },
}
