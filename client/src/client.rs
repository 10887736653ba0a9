use direct_upload_http_errors::ErrorResponseData;
use direct_upload_types::{CredentialRequest, CredentialResponse, UploadCredential, UploadMethod};
use tracing::{event, instrument, Level};

use crate::{
    error::{Error, Result},
    file::UploadFile,
    outcome::Uploaded,
    progress::ProgressCallback,
    transport::Transport,
};

/// Path of the credential endpoint, relative to the server's base URL.
pub const CREDENTIAL_PATH: &str = "/api/oss-upload";

/// Requests upload credentials from a running issuer.
#[derive(Debug, Clone)]
pub struct CredentialClient {
    client: reqwest::Client,
    endpoint: String,
}

impl CredentialClient {
    /// `server` is the base URL of the issuer, e.g. `http://localhost:7205`.
    pub fn new(server: &str) -> CredentialClient {
        CredentialClient::with_client(reqwest::Client::new(), server)
    }

    pub fn with_client(client: reqwest::Client, server: &str) -> CredentialClient {
        CredentialClient {
            client,
            endpoint: format!("{}{}", server.trim_end_matches('/'), CREDENTIAL_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[instrument(skip_all, fields(filename = %request.filename))]
    pub async fn request(&self, request: &CredentialRequest) -> Result<UploadCredential> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(Error::Network)?;

        let status = response.status();
        let body = response.bytes().await.map_err(Error::Network)?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorResponseData>(&body)
                .map(|data| data.message().to_string())
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
            event!(Level::ERROR, status=%status, %message, "Credential request failed");
            return Err(Error::CredentialRequest {
                status: status.as_u16(),
                message,
            });
        }

        let response: CredentialResponse = serde_json::from_slice(&body)?;
        let credential = UploadCredential::try_from(response)?;
        event!(Level::DEBUG, key=%credential.key(), "Received credential");
        Ok(credential)
    }
}

/// Fetches a credential for a file and uploads it in one step.
#[derive(Debug, Clone)]
pub struct UploadClient {
    pub credentials: CredentialClient,
    pub transport: Transport,
}

impl UploadClient {
    pub fn new(server: &str) -> UploadClient {
        UploadClient {
            credentials: CredentialClient::new(server),
            transport: Transport::new(),
        }
    }

    pub async fn upload(
        &self,
        file: &UploadFile,
        method: Option<UploadMethod>,
        on_progress: Option<ProgressCallback>,
    ) -> Result<Uploaded> {
        let request = CredentialRequest {
            filename: file.name.clone(),
            content_type: file.content_type.clone(),
            size: Some(file.size()),
            method,
        };

        let credential = self.credentials.request(&request).await?;
        self.transport.upload(file, &credential, on_progress).await
    }
}
