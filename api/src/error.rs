use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use direct_upload_http_errors::ErrorResponseData;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error(transparent)]
    Credential(#[from] direct_upload_storage::Error),
}

impl Error {
    fn error_kind(&self) -> &'static str {
        match self {
            Error::InvalidBody(_) => "invalid_request",
            Error::Credential(direct_upload_storage::Error::PayloadTooLarge { .. }) => {
                "payload_too_large"
            }
            Error::Credential(direct_upload_storage::Error::InvalidRequest(_)) => "invalid_request",
            Error::Credential(direct_upload_storage::Error::SigningFailure(_)) => "signing_failure",
            Error::Credential(
                direct_upload_storage::Error::InvalidUri(_)
                | direct_upload_storage::Error::UriMissingHost
                | direct_upload_storage::Error::UriHasPath
                | direct_upload_storage::Error::MissingField(_)
                | direct_upload_storage::Error::InvalidConfig(_),
            ) => "internal_server_error",
        }
    }

    pub fn response_tuple(&self) -> (StatusCode, ErrorResponseData) {
        let status = match self {
            Error::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Error::Credential(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Signing details stay in the logs.
        let message = match self {
            Error::Credential(e) if !e.is_client_error() => {
                tracing::event!(tracing::Level::ERROR, error=%e, "Credential signing failed");
                "Failed to issue upload credential".to_string()
            }
            _ => self.to_string(),
        };

        (status, ErrorResponseData::new(self.error_kind(), message))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (code, json) = self.response_tuple();
        (code, Json(json)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_bad_requests() {
        let (status, data) = Error::from(direct_upload_storage::Error::PayloadTooLarge {
            size: 20,
            max: 10,
        })
        .response_tuple();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(data.kind(), "payload_too_large");

        let (status, data) =
            Error::from(direct_upload_storage::Error::InvalidRequest("no".to_string()))
                .response_tuple();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(data.kind(), "invalid_request");
    }

    #[test]
    fn signing_failures_hide_details() {
        let (status, data) =
            Error::from(direct_upload_storage::Error::SigningFailure("bad key".to_string()))
                .response_tuple();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(data.kind(), "signing_failure");
        assert_eq!(data.message(), "Failed to issue upload credential");
    }

    #[test]
    fn config_errors_are_internal() {
        let (status, data) =
            Error::from(direct_upload_storage::Error::MissingField("bucket")).response_tuple();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(data.kind(), "internal_server_error");
        assert_eq!(data.message(), "Failed to issue upload credential");

        let (status, data) = Error::from(direct_upload_storage::Error::UriHasPath).response_tuple();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(data.kind(), "internal_server_error");
    }

    #[test]
    fn invalid_body_is_bad_request() {
        let (status, data) = Error::InvalidBody("expected value".to_string()).response_tuple();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(data.kind(), "invalid_request");
        assert!(data.message().contains("expected value"));
    }
}
