use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Turns a client supplied filename into an object key.
#[derive(Debug, Clone)]
pub struct KeyStrategy {
    pub prefix: String,
    /// Replace the filename with `<millis>-<random>.<ext>` so uploads never
    /// collide.
    pub randomize: bool,
}

impl KeyStrategy {
    pub fn new(prefix: impl Into<String>, randomize: bool) -> KeyStrategy {
        KeyStrategy {
            prefix: prefix.into(),
            randomize,
        }
    }

    pub fn derive(&self, filename: &str) -> Result<String> {
        self.derive_at(filename, Utc::now())
    }

    pub fn derive_at(&self, filename: &str, now: DateTime<Utc>) -> Result<String> {
        let filename = validate_filename(filename)?;

        if !self.randomize {
            return Ok(format!("{}{}", self.prefix, filename));
        }

        let random = Uuid::new_v4().simple().to_string();
        let key = match extension(filename) {
            Some(ext) => format!(
                "{}{}-{}.{}",
                self.prefix,
                now.timestamp_millis(),
                &random[..12],
                ext
            ),
            None => format!("{}{}-{}", self.prefix, now.timestamp_millis(), &random[..12]),
        };

        Ok(key)
    }
}

fn validate_filename(filename: &str) -> Result<&str> {
    let filename = filename.trim();
    if filename.is_empty() {
        return Err(Error::InvalidRequest("filename is required".to_string()));
    }

    if filename.starts_with('/')
        || filename.contains('\\')
        || filename.split('/').any(|segment| segment == ".." || segment.is_empty())
    {
        return Err(Error::InvalidRequest(format!(
            "filename {:?} is not a valid relative path",
            filename
        )));
    }

    Ok(filename)
}

fn extension(filename: &str) -> Option<String> {
    let name = filename.rsplit('/').next()?;
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    Some(ext.to_ascii_lowercase())
}
