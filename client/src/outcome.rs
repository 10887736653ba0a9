use serde::Serialize;

use crate::error::Error;

/// A completed upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uploaded {
    pub access_url: String,
    pub status: u16,
}

/// Flattened result of an upload, in the shape browser callers expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl From<Result<Uploaded, Error>> for UploadOutcome {
    fn from(result: Result<Uploaded, Error>) -> Self {
        match result {
            Ok(uploaded) => UploadOutcome {
                success: true,
                access_url: Some(uploaded.access_url),
                error_code: None,
                error_message: None,
            },
            Err(e) => UploadOutcome {
                success: false,
                access_url: None,
                error_code: Some(e.code().to_string()),
                error_message: Some(e.message()),
            },
        }
    }
}
