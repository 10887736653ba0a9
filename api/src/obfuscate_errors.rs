use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::future::BoxFuture;
use serde_json::json;
use tower::{Layer, Service};

/// Replaces the body of internal and auth errors with a generic message so
/// that production responses never leak details.
#[derive(Debug, Clone)]
pub struct ObfuscateErrorLayer {
    enabled: bool,
}

impl ObfuscateErrorLayer {
    pub fn new(enabled: bool) -> ObfuscateErrorLayer {
        ObfuscateErrorLayer { enabled }
    }
}

impl<S> Layer<S> for ObfuscateErrorLayer {
    type Service = ObfuscateError<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ObfuscateError {
            inner,
            enabled: self.enabled,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ObfuscateError<S> {
    inner: S,
    enabled: bool,
}

fn generic_message(status: StatusCode) -> Option<(&'static str, &'static str)> {
    match status {
        StatusCode::INTERNAL_SERVER_ERROR => Some(("Internal error", "internal")),
        StatusCode::UNAUTHORIZED => Some(("Unauthorized", "authn")),
        StatusCode::FORBIDDEN => Some(("Forbidden", "authz")),
        _ => None,
    }
}

impl<S> Service<Request<Body>> for ObfuscateError<S>
where
    S: Service<Request<Body>> + Send + 'static,
    S::Future: Send + 'static,
    S::Response: IntoResponse + Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let enabled = self.enabled;
        let fut = self.inner.call(req);
        Box::pin(async move {
            let res = fut.await?.into_response();
            if !enabled {
                return Ok(res);
            }

            let status = res.status();
            let Some((message, kind)) = generic_message(status) else {
                return Ok(res);
            };

            let body = json!({
                "error": message,
                "kind": kind,
            });

            Ok((status, Json(body)).into_response())
        })
    }
}

#[cfg(test)]
mod tests {
    use axum::{routing::get, Router};
    use tower::ServiceExt;

    use super::*;

    async fn fails() -> impl IntoResponse {
        (StatusCode::INTERNAL_SERVER_ERROR, "secret details")
    }

    async fn rejects() -> impl IntoResponse {
        (StatusCode::BAD_REQUEST, "bad input")
    }

    fn app(enabled: bool) -> Router {
        Router::new()
            .route("/fails", get(fails))
            .route("/rejects", get(rejects))
            .layer(ObfuscateErrorLayer::new(enabled))
    }

    async fn body_of(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn hides_internal_errors() {
        let (status, body) = body_of(app(true), "/fails").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body, json!({ "error": "Internal error", "kind": "internal" }));
    }

    #[tokio::test]
    async fn keeps_client_errors() {
        let (status, body) = body_of(app(true), "/rejects").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "bad input");
    }

    #[tokio::test]
    async fn disabled() {
        let (_, body) = body_of(app(false), "/fails").await;
        assert_eq!(body, "secret details");
    }
}
