use thiserror::Error;

/// Failure taxonomy for every store-facing operation.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Input rejected locally, before any network call was made.
    #[error("{0}")]
    Validation(String),

    /// The mutation target does not exist server-side.
    #[error("{0} not found")]
    NotFound(String),

    /// Transport failure, or a non-2xx response from the store. Non-2xx is a
    /// failure regardless of what the body says.
    #[error("pill store unavailable: {0}")]
    StoreUnavailable(String),
}

pub type Result<T, E = TrackerError> = std::result::Result<T, E>;
