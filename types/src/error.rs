use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown upload method {0}")]
    UnknownMethod(String),

    #[error("Credential response for a form upload has no formData")]
    MissingFormData,
}
