use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::{event, Level};

/// JSON body returned for every failed request: `{ "error": ..., "kind": ... }`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseData {
    error: Cow<'static, str>,
    #[serde(default)]
    kind: Cow<'static, str>,
}

impl ErrorResponseData {
    pub fn new(
        kind: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> ErrorResponseData {
        let ret = ErrorResponseData {
            error: message.into(),
            kind: kind.into(),
        };

        event!(Level::ERROR, kind=%ret.kind, message=%ret.error);

        ret
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.error
    }
}
