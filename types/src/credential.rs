use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;

/// How the client transfers the file to storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadMethod {
    /// Multipart form submission authorized by a signed policy document.
    #[default]
    Post,
    /// Binary PUT to a presigned URL.
    Put,
}

impl UploadMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadMethod::Post => "post",
            UploadMethod::Put => "put",
        }
    }
}

impl fmt::Display for UploadMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UploadMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "post" => Ok(UploadMethod::Post),
            "put" => Ok(UploadMethod::Put),
            _ => Err(Error::UnknownMethod(s.to_string())),
        }
    }
}

/// A request for upload authorization, after the object key has been decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub key: String,
    pub content_type: String,
    /// Declared size of the file in bytes, if the client knows it.
    pub size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormCredential {
    pub post_url: String,
    /// Form fields that must precede the file part, including the encoded
    /// policy and its signature.
    pub fields: BTreeMap<String, String>,
    pub key: String,
    pub access_url: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectCredential {
    pub put_url: String,
    /// The Content-Type the URL was signed with. Storage rejects the PUT if
    /// the request sends anything else.
    pub content_type: String,
    pub key: String,
    pub access_url: String,
    pub expires_at: DateTime<Utc>,
}

/// Time-limited authorization to upload a single object.
///
/// Nothing prevents a credential from being used more than once before it
/// expires; whether a second upload succeeds is up to the storage service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method")]
pub enum UploadCredential {
    #[serde(rename = "post")]
    Form(FormCredential),
    #[serde(rename = "put")]
    Direct(DirectCredential),
}

impl UploadCredential {
    pub fn method(&self) -> UploadMethod {
        match self {
            UploadCredential::Form(_) => UploadMethod::Post,
            UploadCredential::Direct(_) => UploadMethod::Put,
        }
    }

    pub fn upload_url(&self) -> &str {
        match self {
            UploadCredential::Form(f) => f.post_url.as_str(),
            UploadCredential::Direct(d) => d.put_url.as_str(),
        }
    }

    pub fn access_url(&self) -> &str {
        match self {
            UploadCredential::Form(f) => f.access_url.as_str(),
            UploadCredential::Direct(d) => d.access_url.as_str(),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            UploadCredential::Form(f) => f.key.as_str(),
            UploadCredential::Direct(d) => d.key.as_str(),
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        match self {
            UploadCredential::Form(f) => f.expires_at,
            UploadCredential::Direct(d) => d.expires_at,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at() <= now
    }
}
