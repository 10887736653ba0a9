use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The request never got a response.
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Storage answered with a non-2xx status.
    #[error("Storage rejected the upload ({status}): {code}: {message}")]
    StorageRejected {
        status: u16,
        code: String,
        message: String,
        request_id: Option<String>,
    },

    #[error("Credential request failed ({status}): {message}")]
    CredentialRequest { status: u16, message: String },

    #[error("Malformed credential response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("Invalid credential: {0}")]
    InvalidCredential(#[from] direct_upload_types::Error),

    #[error("Invalid content type {0}")]
    InvalidContentType(String),

    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// Short machine readable code. Storage rejections carry the provider's
    /// own error code.
    pub fn code(&self) -> &str {
        match self {
            Error::Network(_) => "NetworkError",
            Error::StorageRejected { code, .. } => code.as_str(),
            Error::CredentialRequest { .. } => "CredentialRequestFailed",
            Error::MalformedResponse(_) => "MalformedResponse",
            Error::InvalidCredential(_) => "InvalidCredential",
            Error::InvalidContentType(_) => "InvalidContentType",
            Error::IoError(_) => "IoError",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Error::StorageRejected { message, .. } => message.clone(),
            Error::CredentialRequest { message, .. } => message.clone(),
            _ => self.to_string(),
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network(_))
    }
}
