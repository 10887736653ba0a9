use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{ser::SerializeSeq, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// A single constraint the storage service enforces on a form upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// `["content-length-range", min, max]`
    ContentLengthRange { min: u64, max: u64 },
    /// `["eq", "$<field>", value]`
    Eq { field: String, value: String },
}

impl Condition {
    pub fn key(key: impl Into<String>) -> Condition {
        Condition::Eq {
            field: "key".to_string(),
            value: key.into(),
        }
    }

    pub fn content_type(content_type: impl Into<String>) -> Condition {
        Condition::Eq {
            field: "Content-Type".to_string(),
            value: content_type.into(),
        }
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(3))?;
        match self {
            Condition::ContentLengthRange { min, max } => {
                seq.serialize_element("content-length-range")?;
                seq.serialize_element(min)?;
                seq.serialize_element(max)?;
            }
            Condition::Eq { field, value } => {
                seq.serialize_element("eq")?;
                seq.serialize_element(&format!("${}", field))?;
                seq.serialize_element(value)?;
            }
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error as _;

        let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
        match raw.as_slice() {
            [op, min, max] if op == "content-length-range" => {
                let min = min
                    .as_u64()
                    .ok_or_else(|| D::Error::custom("content-length-range min must be a number"))?;
                let max = max
                    .as_u64()
                    .ok_or_else(|| D::Error::custom("content-length-range max must be a number"))?;
                Ok(Condition::ContentLengthRange { min, max })
            }
            [op, field, value] if op == "eq" => {
                let field = field
                    .as_str()
                    .and_then(|f| f.strip_prefix('$'))
                    .ok_or_else(|| D::Error::custom("eq condition must name a $field"))?;
                let value = value
                    .as_str()
                    .ok_or_else(|| D::Error::custom("eq condition value must be a string"))?;
                Ok(Condition::Eq {
                    field: field.to_string(),
                    value: value.to_string(),
                })
            }
            _ => Err(D::Error::custom("unsupported policy condition")),
        }
    }
}

/// The policy document embedded in a form upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDocument {
    #[serde(with = "expiration_format")]
    pub expiration: DateTime<Utc>,
    pub conditions: Vec<Condition>,
}

impl PolicyDocument {
    pub fn new(expiration: DateTime<Utc>) -> PolicyDocument {
        PolicyDocument {
            expiration,
            conditions: Vec::new(),
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> PolicyDocument {
        self.conditions.push(condition);
        self
    }

    /// Serializes the policy and encodes it as base64, ready to be signed.
    pub fn encode(&self) -> Result<String> {
        let json = serde_json::to_vec(self).map_err(|e| Error::SigningFailure(e.to_string()))?;
        Ok(base64::engine::general_purpose::STANDARD.encode(json))
    }

    pub fn decode(encoded: &str) -> Result<PolicyDocument> {
        let json = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| Error::InvalidRequest(format!("policy is not base64: {}", e)))?;
        serde_json::from_slice(&json)
            .map_err(|e| Error::InvalidRequest(format!("policy is not valid JSON: {}", e)))
    }

    /// The value the policy requires for a form field, if it pins one.
    pub fn required_value(&self, field: &str) -> Option<&str> {
        self.conditions.iter().find_map(|c| match c {
            Condition::Eq { field: f, value } if f == field => Some(value.as_str()),
            _ => None,
        })
    }
}

mod expiration_format {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT)
            .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
            .map_err(serde::de::Error::custom)
    }
}
