//! Defines the app level error type and its conversion to JSON error responses.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A request parameter was out of range or could not be parsed.
    ///
    /// `field` is the name of the offending query parameter as the client
    /// sent it, e.g. "perPage".
    #[error("invalid value for \"{field}\": {reason}")]
    InvalidParameter {
        /// The query parameter that was rejected.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// The record store could not be read from or written to.
    ///
    /// This is an infrastructure failure and the client may retry later. It
    /// must never be reported as an empty result.
    #[error("the record store is unavailable: {0}")]
    StoreUnavailable(String),

    /// The remote dataset could not be fetched or decoded.
    #[error("could not fetch the remote dataset: {0}")]
    RemoteFetchFailure(String),

    /// A record in the remote dataset broke a data model invariant.
    ///
    /// `index` is the position of the record in the dataset.
    #[error("record #{index} in the remote dataset is invalid: {reason}")]
    InvalidRecord {
        /// The position of the record in the dataset.
        index: usize,
        /// The invariant that was broken.
        reason: String,
    },
}

impl Error {
    /// Shortcut for creating an [Error::InvalidParameter].
    pub(crate) fn invalid_parameter(field: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
            Error::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::RemoteFetchFailure(_) | Error::InvalidRecord { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {error}");
        Error::StoreUnavailable(error.to_string())
    }
}

/// The JSON body sent to the client when a request fails.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    field: Option<&'static str>,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("An unexpected error occurred: {self}");
        }

        let field = match &self {
            Error::InvalidParameter { field, .. } => Some(*field),
            _ => None,
        };

        let body = ErrorBody {
            error: self.to_string(),
            field,
        };

        (status, Json(body)).into_response()
    }
}
