use std::sync::Arc;

use thiserror::Error;

/// Result type used by the vendor client seam and the client factory.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures reported by the Kameleoon client or while building one.
///
/// The resolver never lets these escape a fetch call: each variant is mapped onto an
/// [`ErrorCode`](crate::ErrorCode) and returned inside
/// [`ResolutionDetails`](crate::ResolutionDetails).
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// Client creation was requested with an empty site code.
    #[error("site code is empty")]
    SiteCodeIsEmpty,

    /// The visitor code (targeting key) was rejected by the client.
    #[error("{0}")]
    VisitorCodeInvalid(String),

    /// The requested feature flag does not exist.
    #[error("{0}")]
    FeatureNotFound(String),

    /// The feature flag exists but is disabled for the current environment.
    #[error("{0}")]
    FeatureEnvironmentDisabled(String),

    /// A client configuration file could not be parsed.
    #[error("error parsing client configuration: {0}")]
    ConfigParseError(#[source] Arc<serde_json::Error>),

    /// An I/O error while reading a configuration file.
    #[error(transparent)]
    // std::io::Error is not clonable, so we're wrapping it in an Arc.
    Io(Arc<std::io::Error>),

    /// Any other failure reported by the client.
    #[error("{0}")]
    Sdk(String),
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(Arc::new(value))
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::ConfigParseError(Arc::new(value))
    }
}
