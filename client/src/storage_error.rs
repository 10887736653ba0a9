use serde::Deserialize;
use tracing::{event, Level};

pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Deserialize)]
struct ErrorDocument {
    #[serde(rename = "Code")]
    code: Option<String>,
    #[serde(rename = "Message")]
    message: Option<String>,
    #[serde(rename = "RequestId")]
    request_id: Option<String>,
}

/// The error a storage service reports in an `<Error>` XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageError {
    pub code: String,
    pub message: String,
    pub request_id: Option<String>,
}

impl StorageError {
    /// Parses an error body. Never fails: anything that can't be read becomes
    /// [UNKNOWN].
    pub fn parse(body: &str) -> StorageError {
        let doc = match quick_xml::de::from_str::<ErrorDocument>(body) {
            Ok(doc) => doc,
            Err(e) => {
                event!(Level::DEBUG, error=%e, "Could not parse storage error body");
                ErrorDocument {
                    code: None,
                    message: None,
                    request_id: None,
                }
            }
        };

        StorageError {
            code: non_empty(doc.code),
            message: non_empty(doc.message),
            request_id: doc.request_id.filter(|id| !id.trim().is_empty()),
        }
    }
}

fn non_empty(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}
