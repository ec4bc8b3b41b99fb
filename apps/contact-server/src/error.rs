//! Error types for the contact server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use contact_mailer::ContactError;
use thiserror::Error;
use tracing::{debug, error};

/// Failures of a `/submit` request
///
/// The display strings double as the plain-text response bodies.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request method")]
    MethodNotAllowed,

    #[error("Failed to parse request body")]
    InvalidBody(#[source] ContactError),

    #[error("Failed to parse request body")]
    UnreadableBody(#[source] axum::Error),

    #[error("Failed to send email")]
    SendFailed(#[source] ContactError),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ServerError::InvalidBody(_) | ServerError::UnreadableBody(_) => {
                StatusCode::BAD_REQUEST
            }
            ServerError::SendFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ContactError> for ServerError {
    fn from(err: ContactError) -> Self {
        if err.is_client_error() {
            ServerError::InvalidBody(err)
        } else {
            ServerError::SendFailed(err)
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match &self {
            ServerError::MethodNotAllowed => debug!("Rejected non-POST submit request"),
            ServerError::InvalidBody(cause) => error!(error = %cause, "Failed to decode JSON"),
            ServerError::UnreadableBody(cause) => error!(error = %cause, "Failed to read body"),
            ServerError::SendFailed(cause) => error!(error = %cause, "Failed to send email"),
        }

        (self.status(), self.to_string()).into_response()
    }
}
