use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use chrono::{Duration, Utc};
use direct_upload_client::{
    types::{DirectCredential, FormCredential, UploadCredential},
    ProgressCallback, UploadFile,
};
use once_cell::sync::Lazy;

pub fn start_tracing() {
    Lazy::force(&direct_upload_test::TRACING);
}

pub fn png_file(size: usize) -> UploadFile {
    UploadFile::new("photo.png", "image/png", vec![7u8; size])
}

pub fn form_credential(base: &str) -> UploadCredential {
    let fields = BTreeMap::from([
        ("OSSAccessKeyId".to_string(), "LTAI5tExampleKey".to_string()),
        ("policy".to_string(), "eyJleHBpcmF0aW9uIjoiIn0=".to_string()),
        ("Signature".to_string(), "c2lnbmF0dXJl".to_string()),
        ("key".to_string(), "uploads/photo.png".to_string()),
        ("success_action_status".to_string(), "200".to_string()),
        ("Content-Type".to_string(), "image/png".to_string()),
    ]);

    UploadCredential::Form(FormCredential {
        post_url: format!("{}/examplebucket", base),
        fields,
        key: "uploads/photo.png".to_string(),
        access_url: "https://cdn.example.com/uploads/photo.png".to_string(),
        expires_at: Utc::now() + Duration::minutes(10),
    })
}

pub fn direct_credential(base: &str) -> UploadCredential {
    UploadCredential::Direct(DirectCredential {
        put_url: format!(
            "{}/examplebucket/uploads/photo.png?x-oss-signature=abc",
            base
        ),
        content_type: "image/png".to_string(),
        key: "uploads/photo.png".to_string(),
        access_url: "https://cdn.example.com/uploads/photo.png".to_string(),
        expires_at: Utc::now() + Duration::minutes(10),
    })
}

pub fn progress_recorder() -> (ProgressCallback, Arc<Mutex<Vec<u8>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let callback: ProgressCallback = Arc::new(move |p| sink.lock().unwrap().push(p));
    (callback, seen)
}

/// Splits a `multipart/form-data` body into `(name, value)` pairs in the order
/// they were sent.
pub fn multipart_parts(body: &[u8]) -> Vec<(String, String)> {
    let body = String::from_utf8_lossy(body);
    let boundary = body
        .split("\r\n")
        .next()
        .filter(|line| line.starts_with("--"))
        .expect("body starts with a boundary")
        .to_string();

    body.split(boundary.as_str())
        .skip(1)
        .filter(|part| !part.starts_with("--"))
        .map(|part| {
            let part = part.strip_prefix("\r\n").unwrap_or(part);
            let (headers, value) = part.split_once("\r\n\r\n").expect("part has headers");
            let name = headers
                .split("name=\"")
                .nth(1)
                .and_then(|rest| rest.split('"').next())
                .expect("part has a name")
                .to_string();
            let value = value.strip_suffix("\r\n").unwrap_or(value).to_string();
            (name, value)
        })
        .collect()
}
