use http::uri::InvalidUri;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Declared size of {size} bytes exceeds the limit of {max} bytes")]
    PayloadTooLarge { size: u64, max: u64 },

    #[error("Signing upload credential: {0}")]
    SigningFailure(String),

    #[error(transparent)]
    InvalidUri(#[from] InvalidUri),

    #[error("Endpoint must include a host")]
    UriMissingHost,

    #[error("Endpoint must not include a path")]
    UriHasPath,

    #[error("Missing field {0}")]
    MissingField(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// True for errors caused by the caller's input rather than by the issuer.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidRequest(_) | Error::PayloadTooLarge { .. })
    }
}
