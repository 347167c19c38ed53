//! Error taxonomy for the route planner.

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    /// A lookup provider answered with nothing usable (or timed out).
    #[error("lookup via {provider} failed: {reason}")]
    LookupFailed { provider: String, reason: String },
    /// Fewer than two stops have coordinates; geometry can't order them.
    #[error("insufficient geo data: {resolved} stop(s) resolved, need at least 2")]
    InsufficientGeoData { resolved: usize },
    #[error("optimization cancelled before any start completed")]
    Cancelled,
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn lookup_failed(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LookupFailed {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
