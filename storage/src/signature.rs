use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;

/// Signs a base64 encoded policy document for a form upload.
///
/// OSS still mandates HMAC-SHA1 for form policies. The result is base64
/// encoded.
pub fn sign_policy(secret: &str, encoded_policy: &str) -> Result<String> {
    let mut mac = HmacSha1::new_from_slice(secret.as_bytes())
        .map_err(|e| Error::SigningFailure(e.to_string()))?;
    mac.update(encoded_policy.as_bytes());
    let signature = mac.finalize().into_bytes();
    Ok(base64::engine::general_purpose::STANDARD.encode(signature))
}

pub(crate) fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut mac =
        HmacSha256::new_from_slice(key).map_err(|e| Error::SigningFailure(e.to_string()))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

pub(crate) fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Derives the V4 signing key for a date (`YYYYMMDD`) and region id.
pub(crate) fn v4_signing_key(secret: &str, date: &str, region: &str) -> Result<Vec<u8>> {
    let date_key = hmac_sha256(format!("aliyun_v4{}", secret).as_bytes(), date.as_bytes())?;
    let region_key = hmac_sha256(&date_key, region.as_bytes())?;
    let service_key = hmac_sha256(&region_key, b"oss")?;
    hmac_sha256(&service_key, b"aliyun_v4_request")
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 2202 / RFC 4231 test case 2.
    const KEY: &str = "Jefe";
    const DATA: &str = "what do ya want for nothing?";

    #[test]
    fn policy_signature_is_base64_hmac_sha1() {
        assert_eq!(sign_policy(KEY, DATA).unwrap(), "7/zfauXrL6LSdBbV8YTfnCWafHk=");
    }

    #[test]
    fn policy_signature_is_deterministic() {
        let first = sign_policy("secret", "eyJleHBpcmF0aW9uIjoi").unwrap();
        let second = sign_policy("secret", "eyJleHBpcmF0aW9uIjoi").unwrap();
        assert_eq!(first, second);
        assert_ne!(first, sign_policy("other", "eyJleHBpcmF0aW9uIjoi").unwrap());
    }

    #[test]
    fn hmac_sha256_vector() {
        let mac = hmac_sha256(KEY.as_bytes(), DATA.as_bytes()).unwrap();
        assert_eq!(
            hex::encode(mac),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn signing_key_depends_on_scope() {
        let key = v4_signing_key("secret", "20261016", "cn-hangzhou").unwrap();
        assert_eq!(key.len(), 32);
        assert_eq!(
            key,
            v4_signing_key("secret", "20261016", "cn-hangzhou").unwrap()
        );
        assert_ne!(
            key,
            v4_signing_key("secret", "20261017", "cn-hangzhou").unwrap()
        );
        assert_ne!(
            key,
            v4_signing_key("secret", "20261016", "cn-shanghai").unwrap()
        );
    }
}
