use direct_upload_types::{DirectCredential, FormCredential, UploadCredential};
use reqwest::{
    header::{CONTENT_LENGTH, CONTENT_TYPE},
    multipart::{Form, Part},
};
use tracing::{event, instrument, Level};

use crate::{
    error::{Error, Result},
    file::UploadFile,
    outcome::Uploaded,
    progress::{tracked_body, ProgressCallback, ProgressTracker},
    storage_error::StorageError,
};

/// Bytes handed to the connection between progress reports.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Sends files to object storage using credentials from the issuer.
#[derive(Debug, Clone)]
pub struct Transport {
    client: reqwest::Client,
    chunk_size: usize,
}

impl Default for Transport {
    fn default() -> Self {
        Transport::new()
    }
}

impl Transport {
    pub fn new() -> Transport {
        Transport::with_client(reqwest::Client::new())
    }

    pub fn with_client(client: reqwest::Client) -> Transport {
        Transport {
            client,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Transport {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Upload `file` using `credential`. Progress, when requested, is reported
    /// as a percentage of the file's bytes.
    #[instrument(skip_all, fields(key = %credential.key(), method = %credential.method()))]
    pub async fn upload(
        &self,
        file: &UploadFile,
        credential: &UploadCredential,
        on_progress: Option<ProgressCallback>,
    ) -> Result<Uploaded> {
        let tracker = ProgressTracker::new(file.size(), on_progress);
        let request = match credential {
            UploadCredential::Form(form) => self.form_request(file, form, tracker)?,
            UploadCredential::Direct(direct) => self.direct_request(file, direct, tracker),
        };

        let response = request.send().await.map_err(|e| {
            event!(Level::ERROR, error=%e, "Upload did not reach storage");
            Error::Network(e)
        })?;

        let status = response.status();
        if status.is_success() {
            event!(Level::INFO, status=%status, "Upload complete");
            return Ok(Uploaded {
                access_url: credential.access_url().to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.unwrap_or_default();
        let error = StorageError::parse(&body);
        event!(
            Level::ERROR,
            status=%status,
            code=%error.code,
            request_id=?error.request_id,
            "Storage rejected the upload"
        );

        Err(Error::StorageRejected {
            status: status.as_u16(),
            code: error.code,
            message: error.message,
            request_id: error.request_id,
        })
    }

    fn form_request(
        &self,
        file: &UploadFile,
        credential: &FormCredential,
        tracker: ProgressTracker,
    ) -> Result<reqwest::RequestBuilder> {
        // OSS ignores any field that comes after the file.
        let form = credential
            .fields
            .iter()
            .fold(Form::new(), |form, (name, value)| {
                form.text(name.clone(), value.clone())
            });

        let body = tracked_body(file.bytes.clone(), self.chunk_size, tracker);
        let part = Part::stream_with_length(body, file.size())
            .file_name(file.name.clone())
            .mime_str(&file.content_type)
            .map_err(|_| Error::InvalidContentType(file.content_type.clone()))?;

        Ok(self
            .client
            .post(&credential.post_url)
            .multipart(form.part("file", part)))
    }

    fn direct_request(
        &self,
        file: &UploadFile,
        credential: &DirectCredential,
        tracker: ProgressTracker,
    ) -> reqwest::RequestBuilder {
        // The signature covers the content type, so send exactly the one it was
        // issued for.
        let body = tracked_body(file.bytes.clone(), self.chunk_size, tracker);
        self.client
            .put(&credential.put_url)
            .header(CONTENT_TYPE, credential.content_type.as_str())
            .header(CONTENT_LENGTH, file.size())
            .body(body)
    }
}
