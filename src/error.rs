//! Error types shared across the crate

use crate::ride::RideStatus;

/// Failure reported by a location source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable")]
    PositionUnavailable,

    #[error("location request timed out")]
    Timeout,
}

/// Ride session errors. None of them are fatal to the ride.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RideError {
    #[error("cannot {operation} a ride that is {status}")]
    InvalidState {
        operation: &'static str,
        status: RideStatus,
    },

    #[error("location unavailable: {0}")]
    LocationUnavailable(#[from] LocationError),
}

/// Persistence failures of the user and session stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("corrupt record `{0}`")]
    Corrupt(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("wrong e-mail or password")]
    InvalidCredentials,

    #[error("e-mail `{0}` is already registered")]
    EmailTaken(String),

    #[error("username `{0}` is already in use")]
    UsernameTaken(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors while reading recorded samples.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("{0} header not found")]
    MissingHeader(&'static str),

    #[error("failed on read the source: {0}")]
    Read(String),

    #[error("error with row {row}: {reason}")]
    InvalidRow { row: String, reason: String },
}

/// Errors of the external route/insight advisor.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("advisor unavailable: {0}")]
    Unavailable(String),

    #[error("advisor returned an invalid response: {0}")]
    InvalidResponse(String),
}
