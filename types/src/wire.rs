use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DirectCredential, Error, FormCredential, UploadCredential, UploadMethod};

/// Body of `POST /api/oss-upload`.
///
/// Missing fields deserialize to empty values so that the issuer can report
/// them as an invalid request instead of the JSON extractor rejecting them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRequest {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<UploadMethod>,
}

/// Successful response of `POST /api/oss-upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialResponse {
    pub upload_url: String,
    pub access_url: String,
    pub method: UploadMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_data: Option<BTreeMap<String, String>>,
    pub key: String,
    pub expires_at: DateTime<Utc>,
    pub content_type: String,
}

impl From<UploadCredential> for CredentialResponse {
    fn from(credential: UploadCredential) -> Self {
        match credential {
            UploadCredential::Form(form) => {
                let content_type = form.fields.get("Content-Type").cloned().unwrap_or_default();
                CredentialResponse {
                    upload_url: form.post_url,
                    access_url: form.access_url,
                    method: UploadMethod::Post,
                    form_data: Some(form.fields),
                    key: form.key,
                    expires_at: form.expires_at,
                    content_type,
                }
            }
            UploadCredential::Direct(direct) => CredentialResponse {
                upload_url: direct.put_url,
                access_url: direct.access_url,
                method: UploadMethod::Put,
                form_data: None,
                key: direct.key,
                expires_at: direct.expires_at,
                content_type: direct.content_type,
            },
        }
    }
}

impl TryFrom<CredentialResponse> for UploadCredential {
    type Error = Error;

    fn try_from(response: CredentialResponse) -> Result<Self, Self::Error> {
        match response.method {
            UploadMethod::Post => Ok(UploadCredential::Form(FormCredential {
                post_url: response.upload_url,
                fields: response.form_data.ok_or(Error::MissingFormData)?,
                key: response.key,
                access_url: response.access_url,
                expires_at: response.expires_at,
            })),
            UploadMethod::Put => Ok(UploadCredential::Direct(DirectCredential {
                put_url: response.upload_url,
                content_type: response.content_type,
                key: response.key,
                access_url: response.access_url,
                expires_at: response.expires_at,
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_tolerates_missing_fields() {
        let request: CredentialRequest = serde_json::from_str(r#"{"filename":"a.png"}"#).unwrap();
        assert_eq!(request.filename, "a.png");
        assert_eq!(request.content_type, "");
        assert_eq!(request.size, None);
        assert_eq!(request.method, None);

        let request: CredentialRequest = serde_json::from_str(
            r#"{"filename":"a.png","contentType":"image/png","size":10,"method":"put"}"#,
        )
        .unwrap();
        assert_eq!(request.content_type, "image/png");
        assert_eq!(request.size, Some(10));
        assert_eq!(request.method, Some(UploadMethod::Put));
    }

    #[test]
    fn form_response_uses_camel_case() {
        let mut fields = BTreeMap::new();
        fields.insert("key".to_string(), "uploads/a.png".to_string());
        fields.insert("Content-Type".to_string(), "image/png".to_string());

        let response = CredentialResponse::from(UploadCredential::Form(FormCredential {
            post_url: "https://bucket.oss-cn-hangzhou.aliyuncs.com".to_string(),
            fields,
            key: "uploads/a.png".to_string(),
            access_url: "https://bucket.oss-cn-hangzhou.aliyuncs.com/uploads/a.png".to_string(),
            expires_at: Utc::now(),
        }));

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["method"], "post");
        assert_eq!(json["uploadUrl"], "https://bucket.oss-cn-hangzhou.aliyuncs.com");
        assert_eq!(json["formData"]["key"], "uploads/a.png");
        assert_eq!(json["contentType"], "image/png");
        assert!(json.get("accessUrl").is_some());
    }

    #[test]
    fn put_response_omits_form_data() {
        let response = CredentialResponse::from(UploadCredential::Direct(DirectCredential {
            put_url: "https://bucket.oss-cn-hangzhou.aliyuncs.com/a.png?x-oss-signature=1"
                .to_string(),
            content_type: "image/png".to_string(),
            key: "a.png".to_string(),
            access_url: "https://bucket.oss-cn-hangzhou.aliyuncs.com/a.png".to_string(),
            expires_at: Utc::now(),
        }));

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["method"], "put");
        assert!(json.get("formData").is_none());
    }

    #[test]
    fn post_response_without_form_data_is_rejected() {
        let response = CredentialResponse {
            upload_url: "https://bucket.oss-cn-hangzhou.aliyuncs.com".to_string(),
            access_url: "https://bucket.oss-cn-hangzhou.aliyuncs.com/a.png".to_string(),
            method: UploadMethod::Post,
            form_data: None,
            key: "a.png".to_string(),
            expires_at: Utc::now(),
            content_type: "image/png".to_string(),
        };

        assert!(matches!(
            UploadCredential::try_from(response),
            Err(Error::MissingFormData)
        ));
    }
}
