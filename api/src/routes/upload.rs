use axum::{extract::rejection::JsonRejection, routing::post, Extension, Json, Router};
use direct_upload_types::{CredentialRequest, CredentialResponse, UploadRequest};
use tracing::{event, instrument, Level};

use crate::{error::Error, shared_state::State, Result};

/// Issue a credential for uploading one file directly to storage.
#[instrument(skip_all)]
async fn issue_credential(
    Extension(state): Extension<State>,
    body: Result<Json<CredentialRequest>, JsonRejection>,
) -> Result<Json<CredentialResponse>> {
    let Json(body) = body.map_err(|e| Error::InvalidBody(e.body_text()))?;

    let issuer = &state.issuer;
    let key = issuer.derive_key(&body.filename)?;
    let request = UploadRequest {
        key,
        content_type: body.content_type,
        size: body.size,
    };

    let method = body.method.unwrap_or(issuer.config().default_method);
    let credential = issuer.issue_credential_with(&request, method)?;

    event!(
        Level::INFO,
        key=%credential.key(),
        %method,
        size=?request.size,
        "Issued upload credential"
    );

    Ok(Json(CredentialResponse::from(credential)))
}

pub fn configure() -> Router {
    Router::new().route("/oss-upload", post(issue_credential))
}
