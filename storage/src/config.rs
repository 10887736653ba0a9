use std::{fmt, time::Duration};

use direct_upload_types::UploadMethod;

use crate::error::{Error, Result};

pub const DEFAULT_MAX_UPLOAD_SIZE: u64 = 10 * 1024 * 1024;
pub const DEFAULT_EXPIRY: Duration = Duration::from_secs(10 * 60);
/// OSS refuses V4 presigned URLs that live longer than seven days.
pub const MAX_EXPIRY: Duration = Duration::from_secs(7 * 24 * 60 * 60);
pub const DEFAULT_KEY_PREFIX: &str = "uploads/";

/// Everything the issuer needs to sign credentials for one bucket.
#[derive(Clone)]
pub struct OssConfig {
    pub access_key_id: String,
    pub access_key_secret: String,
    pub bucket: String,
    /// Region with or without the `oss-` prefix, e.g. `oss-cn-hangzhou`.
    pub region: String,
    /// Public domain bound to the bucket. Used for access URLs when set.
    pub custom_domain: Option<String>,
    /// Replaces `<region>.aliyuncs.com` as the storage host.
    pub endpoint: Option<String>,
    /// Put the bucket in the path instead of the host name.
    pub path_style: bool,
    pub max_upload_size: u64,
    pub expiry: Duration,
    pub key_prefix: String,
    pub randomize_keys: bool,
    pub default_method: UploadMethod,
    /// Content types that may be uploaded. Empty allows anything.
    pub allowed_content_types: Vec<String>,
}

impl OssConfig {
    pub fn new(
        access_key_id: impl Into<String>,
        access_key_secret: impl Into<String>,
        bucket: impl Into<String>,
        region: impl Into<String>,
    ) -> OssConfig {
        OssConfig {
            access_key_id: access_key_id.into(),
            access_key_secret: access_key_secret.into(),
            bucket: bucket.into(),
            region: region.into(),
            custom_domain: None,
            endpoint: None,
            path_style: false,
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
            expiry: DEFAULT_EXPIRY,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            randomize_keys: true,
            default_method: UploadMethod::Post,
            allowed_content_types: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.access_key_id.is_empty() {
            return Err(Error::MissingField("access_key_id"));
        }
        if self.access_key_secret.is_empty() {
            return Err(Error::MissingField("access_key_secret"));
        }
        if self.bucket.is_empty() {
            return Err(Error::MissingField("bucket"));
        }
        if self.region.is_empty() {
            return Err(Error::MissingField("region"));
        }

        if self.expiry.is_zero() || self.expiry > MAX_EXPIRY {
            return Err(Error::InvalidConfig(format!(
                "expiry must be between 1 and {} seconds",
                MAX_EXPIRY.as_secs()
            )));
        }

        Ok(())
    }

    /// Region as used in host names, always with the `oss-` prefix.
    pub fn host_region(&self) -> String {
        if self.region.starts_with("oss-") {
            self.region.clone()
        } else {
            format!("oss-{}", self.region)
        }
    }

    /// Region as used in V4 credential scopes, without the `oss-` prefix.
    pub fn region_id(&self) -> &str {
        self.region.strip_prefix("oss-").unwrap_or(&self.region)
    }

    pub fn allows_content_type(&self, content_type: &str) -> bool {
        self.allowed_content_types.is_empty()
            || self
                .allowed_content_types
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(content_type))
    }
}

impl fmt::Debug for OssConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OssConfig")
            .field("access_key_id", &self.access_key_id)
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("custom_domain", &self.custom_domain)
            .field("endpoint", &self.endpoint)
            .field("path_style", &self.path_style)
            .field("max_upload_size", &self.max_upload_size)
            .field("expiry", &self.expiry)
            .field("key_prefix", &self.key_prefix)
            .field("randomize_keys", &self.randomize_keys)
            .field("default_method", &self.default_method)
            .field("allowed_content_types", &self.allowed_content_types)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn region_forms() {
        let config = OssConfig::new("id", "secret", "bucket", "oss-cn-hangzhou");
        assert_eq!(config.host_region(), "oss-cn-hangzhou");
        assert_eq!(config.region_id(), "cn-hangzhou");

        let config = OssConfig::new("id", "secret", "bucket", "cn-shanghai");
        assert_eq!(config.host_region(), "oss-cn-shanghai");
        assert_eq!(config.region_id(), "cn-shanghai");
    }

    #[test]
    fn validate() {
        let config = OssConfig::new("id", "secret", "bucket", "cn-hangzhou");
        config.validate().unwrap();

        let mut missing = config.clone();
        missing.access_key_secret = String::new();
        assert_matches!(
            missing.validate(),
            Err(Error::MissingField("access_key_secret"))
        );

        let mut long_lived = config.clone();
        long_lived.expiry = MAX_EXPIRY + Duration::from_secs(1);
        assert_matches!(long_lived.validate(), Err(Error::InvalidConfig(_)));
    }

    #[test]
    fn debug_hides_secret() {
        let config = OssConfig::new("id", "very-secret-value", "bucket", "cn-hangzhou");
        let output = format!("{:?}", config);
        assert!(!output.contains("very-secret-value"));
        assert!(output.contains("bucket"));
    }

    #[test]
    fn content_type_allow_list() {
        let mut config = OssConfig::new("id", "secret", "bucket", "cn-hangzhou");
        assert!(config.allows_content_type("application/zip"));

        config.allowed_content_types = vec!["image/png".to_string(), "image/jpeg".to_string()];
        assert!(config.allows_content_type("image/PNG"));
        assert!(!config.allows_content_type("application/zip"));
    }
}
