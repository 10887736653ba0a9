use http::uri::{Authority, Scheme};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::{event, Level};

use crate::{config::OssConfig, error::Error};

/// Characters left alone when encoding a query component.
pub(crate) const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Same as [UNRESERVED] but keeps `/` so object keys stay hierarchical.
pub(crate) const KEY_PATH: &AsciiSet = &UNRESERVED.remove(b'/');

pub(crate) fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, UNRESERVED).to_string()
}

pub(crate) fn encode_key(key: &str) -> String {
    utf8_percent_encode(key, KEY_PATH).to_string()
}

/// Where the bucket lives and how to address it.
#[derive(Debug, Clone)]
pub(crate) struct BucketEndpoint {
    /// Base URL of the bucket without a trailing slash, e.g.
    /// `https://bucket.oss-cn-hangzhou.aliyuncs.com`.
    pub base_url: String,
    /// Base URL used for access URLs handed back to clients.
    pub public_base_url: String,
}

impl BucketEndpoint {
    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, encode_key(key))
    }

    pub fn access_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, encode_key(key))
    }
}

fn split_scheme(value: &str) -> (Scheme, &str) {
    if let Some(rest) = value.strip_prefix("https://") {
        (Scheme::HTTPS, rest)
    } else if let Some(rest) = value.strip_prefix("http://") {
        (Scheme::HTTP, rest)
    } else {
        // We tolerate a missing https:// on configured hosts.
        (Scheme::HTTPS, value)
    }
}

fn parse_host(value: &str) -> Result<(Scheme, Authority), Error> {
    let (scheme, rest) = split_scheme(value.trim());
    let rest = rest.trim_end_matches('/');
    if rest.is_empty() {
        return Err(Error::UriMissingHost);
    }
    if rest.contains('/') {
        return Err(Error::UriHasPath);
    }

    let authority = rest.parse::<Authority>()?;
    Ok((scheme, authority))
}

pub(crate) fn resolve_endpoint(config: &OssConfig) -> Result<BucketEndpoint, Error> {
    let bucket = config.bucket.as_str();

    let base_url = match config.endpoint.as_deref() {
        Some(endpoint) => {
            let (scheme, authority) = parse_host(endpoint)?;
            let base = if config.path_style {
                format!("{}://{}/{}", scheme.as_str(), authority.as_str(), bucket)
            } else {
                format!("{}://{}.{}", scheme.as_str(), bucket, authority.as_str())
            };
            event!(Level::DEBUG, endpoint=%base, "Using custom storage endpoint");
            base
        }
        None => format!("https://{}.{}.aliyuncs.com", bucket, config.host_region()),
    };

    let public_base_url = match config.custom_domain.as_deref() {
        Some(domain) => {
            let (scheme, authority) = parse_host(domain)?;
            format!("{}://{}", scheme.as_str(), authority.as_str())
        }
        None => base_url.clone(),
    };

    Ok(BucketEndpoint {
        base_url,
        public_base_url,
    })
}
