use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicU64, Ordering},
};

use chrono::{DateTime, Duration, Utc};
use direct_upload_types::{
    DirectCredential, FormCredential, UploadCredential, UploadMethod, UploadRequest,
};
use http::HeaderValue;
use tracing::{event, instrument, Level};

use crate::{
    config::OssConfig,
    error::{Error, Result},
    key::KeyStrategy,
    oss::{resolve_endpoint, BucketEndpoint},
    policy::{Condition, PolicyDocument},
    presigned_url::{PresignPut, PresignedUrl},
    signature::sign_policy,
};

/// Form field OSS uses to decide which status to return on success.
const SUCCESS_STATUS: &str = "200";

/// Issues time-limited upload credentials for a single bucket.
///
/// Issuing is pure computation: nothing is sent to the storage service and no
/// record of issued credentials is kept.
#[derive(Debug)]
pub struct Issuer {
    config: OssConfig,
    endpoint: BucketEndpoint,
    keys: KeyStrategy,
    signatures: AtomicU64,
}

impl Issuer {
    pub fn new(config: OssConfig) -> Result<Issuer> {
        config.validate()?;
        let endpoint = resolve_endpoint(&config)?;
        let keys = KeyStrategy::new(config.key_prefix.clone(), config.randomize_keys);

        event!(
            Level::INFO,
            bucket=%config.bucket,
            region=%config.region,
            endpoint=%endpoint.base_url,
            "Created credential issuer"
        );

        Ok(Issuer {
            config,
            endpoint,
            keys,
            signatures: AtomicU64::new(0),
        })
    }

    pub fn config(&self) -> &OssConfig {
        &self.config
    }

    /// Number of signatures computed so far.
    pub fn signatures_computed(&self) -> u64 {
        self.signatures.load(Ordering::Relaxed)
    }

    pub fn derive_key(&self, filename: &str) -> Result<String> {
        self.keys.derive(filename)
    }

    /// Public URL at which an object will be reachable once uploaded.
    pub fn access_url(&self, key: &str) -> String {
        self.endpoint.access_url(key)
    }

    pub fn issue_credential(&self, request: &UploadRequest) -> Result<UploadCredential> {
        self.issue_credential_with(request, self.config.default_method)
    }

    pub fn issue_credential_with(
        &self,
        request: &UploadRequest,
        method: UploadMethod,
    ) -> Result<UploadCredential> {
        self.issue_credential_at(request, method, Utc::now())
    }

    #[instrument(skip(self, request), fields(key = %request.key))]
    pub fn issue_credential_at(
        &self,
        request: &UploadRequest,
        method: UploadMethod,
        now: DateTime<Utc>,
    ) -> Result<UploadCredential> {
        self.validate(request)?;

        let credential = match method {
            UploadMethod::Post => UploadCredential::Form(self.form_credential(request, now)?),
            UploadMethod::Put => UploadCredential::Direct(self.direct_credential(request, now)?),
        };

        event!(Level::DEBUG, %method, expires_at=%credential.expires_at(), "Issued credential");
        Ok(credential)
    }

    fn validate(&self, request: &UploadRequest) -> Result<()> {
        if request.key.trim().is_empty() {
            return Err(Error::InvalidRequest("key is required".to_string()));
        }
        // The key is signed as given, so it must already be normalized.
        if request.key.trim() != request.key {
            return Err(Error::InvalidRequest(format!(
                "key {:?} has surrounding whitespace",
                request.key
            )));
        }

        let content_type = request.content_type.trim();
        if content_type.is_empty() {
            return Err(Error::InvalidRequest("content type is required".to_string()));
        }
        if !content_type.contains('/') || HeaderValue::from_str(content_type).is_err() {
            return Err(Error::InvalidRequest(format!(
                "{:?} is not a valid content type",
                content_type
            )));
        }
        if !self.config.allows_content_type(content_type) {
            return Err(Error::InvalidRequest(format!(
                "content type {} is not allowed",
                content_type
            )));
        }

        if let Some(size) = request.size {
            if size > self.config.max_upload_size {
                return Err(Error::PayloadTooLarge {
                    size,
                    max: self.config.max_upload_size,
                });
            }
        }

        Ok(())
    }

    fn expires_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + Duration::seconds(self.config.expiry.as_secs() as i64)
    }

    /// Builds a policy document, signs it, and returns the fields a browser
    /// form must submit ahead of the file.
    fn form_credential(&self, request: &UploadRequest, now: DateTime<Utc>) -> Result<FormCredential> {
        let content_type = request.content_type.trim();
        let expires_at = self.expires_at(now);

        let policy = PolicyDocument::new(expires_at)
            .with_condition(Condition::ContentLengthRange {
                min: 0,
                max: self.config.max_upload_size,
            })
            .with_condition(Condition::key(request.key.as_str()))
            .with_condition(Condition::content_type(content_type));

        let encoded_policy = policy.encode()?;
        let signature = sign_policy(&self.config.access_key_secret, &encoded_policy)?;
        self.signatures.fetch_add(1, Ordering::Relaxed);

        let fields = BTreeMap::from([
            (
                "OSSAccessKeyId".to_string(),
                self.config.access_key_id.clone(),
            ),
            ("policy".to_string(), encoded_policy),
            ("Signature".to_string(), signature),
            ("key".to_string(), request.key.clone()),
            (
                "success_action_status".to_string(),
                SUCCESS_STATUS.to_string(),
            ),
            ("Content-Type".to_string(), content_type.to_string()),
        ]);

        Ok(FormCredential {
            post_url: self.endpoint.base_url.clone(),
            fields,
            key: request.key.clone(),
            access_url: self.access_url(&request.key),
            expires_at,
        })
    }

    fn direct_credential(
        &self,
        request: &UploadRequest,
        now: DateTime<Utc>,
    ) -> Result<DirectCredential> {
        let presigned = self.presign_put(request, now)?;

        Ok(DirectCredential {
            put_url: presigned.uri.to_string(),
            content_type: request.content_type.trim().to_string(),
            key: request.key.clone(),
            access_url: self.access_url(&request.key),
            expires_at: presigned.expires_at,
        })
    }

    pub fn presign_put(&self, request: &UploadRequest, now: DateTime<Utc>) -> Result<PresignedUrl> {
        let object_url = self.endpoint.object_url(&request.key);
        let presigned = PresignPut {
            access_key_id: &self.config.access_key_id,
            secret: &self.config.access_key_secret,
            bucket: &self.config.bucket,
            region_id: self.config.region_id(),
            object_url: &object_url,
            key: &request.key,
            content_type: request.content_type.trim(),
            expires_in: self.config.expiry.as_secs(),
            now,
        }
        .sign()?;

        self.signatures.fetch_add(1, Ordering::Relaxed);
        Ok(presigned)
    }
}
