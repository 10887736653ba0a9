use chrono::{DateTime, Duration, Utc};
use http::{header::CONTENT_TYPE, HeaderMap, HeaderValue, Method, Uri};
use tracing::{event, Level};

use crate::{
    error::{Error, Result},
    oss::{encode_component, encode_key},
    signature::{hmac_sha256, sha256_hex, v4_signing_key},
};

const ALGORITHM: &str = "OSS4-HMAC-SHA256";
const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";

/// A URL that authorizes one request until it expires. The request must carry
/// `headers` exactly as given.
#[derive(Debug, Clone)]
pub struct PresignedUrl {
    pub method: http::Method,
    pub uri: http::Uri,
    pub headers: http::HeaderMap,
    pub expires_at: DateTime<Utc>,
}

/// Inputs for a V4 query-string signature on a PUT.
pub(crate) struct PresignPut<'a> {
    pub access_key_id: &'a str,
    pub secret: &'a str,
    pub bucket: &'a str,
    /// Region without the `oss-` prefix.
    pub region_id: &'a str,
    /// Unsigned URL of the object.
    pub object_url: &'a str,
    pub key: &'a str,
    pub content_type: &'a str,
    pub expires_in: u64,
    pub now: DateTime<Utc>,
}

impl<'a> PresignPut<'a> {
    fn date(&self) -> String {
        self.now.format("%Y%m%d").to_string()
    }

    fn timestamp(&self) -> String {
        self.now.format("%Y%m%dT%H%M%SZ").to_string()
    }

    fn scope(&self) -> String {
        format!("{}/{}/oss/aliyun_v4_request", self.date(), self.region_id)
    }

    pub(crate) fn canonical_query(&self) -> String {
        // Already in sorted order.
        let params = [
            (
                "x-oss-credential",
                format!("{}/{}", self.access_key_id, self.scope()),
            ),
            ("x-oss-date", self.timestamp()),
            ("x-oss-expires", self.expires_in.to_string()),
            ("x-oss-signature-version", ALGORITHM.to_string()),
        ];

        params
            .iter()
            .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    pub(crate) fn canonical_request(&self) -> String {
        // Canonical headers end with their own newline, followed by the empty
        // additional-headers line.
        format!(
            "{}\n/{}/{}\n{}\ncontent-type:{}\n\n\n{}",
            Method::PUT,
            self.bucket,
            encode_key(self.key),
            self.canonical_query(),
            self.content_type.trim(),
            UNSIGNED_PAYLOAD
        )
    }

    pub(crate) fn string_to_sign(&self) -> String {
        format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            self.timestamp(),
            self.scope(),
            sha256_hex(self.canonical_request().as_bytes())
        )
    }

    pub(crate) fn sign(&self) -> Result<PresignedUrl> {
        let content_type = HeaderValue::from_str(self.content_type)
            .map_err(|_| Error::InvalidRequest("content type is not a valid header".to_string()))?;

        let signing_key = v4_signing_key(self.secret, &self.date(), self.region_id)?;
        let signature = hex::encode(hmac_sha256(
            &signing_key,
            self.string_to_sign().as_bytes(),
        )?);

        let url = format!(
            "{}?{}&x-oss-signature={}",
            self.object_url,
            self.canonical_query(),
            signature
        );
        event!(Level::DEBUG, key=%self.key, "Presigned PUT url");

        let uri = url.parse::<Uri>()?;
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, content_type);

        Ok(PresignedUrl {
            method: Method::PUT,
            uri,
            headers,
            expires_at: self.now + Duration::seconds(self.expires_in as i64),
        })
    }
}
