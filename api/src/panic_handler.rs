use std::any::Any;

use axum::{
    body::{boxed, BoxBody, Full},
    http::{header, Response, StatusCode},
};

pub fn handle_panic(production: bool, err: Box<dyn Any + Send + 'static>) -> Response<BoxBody> {
    let body = if production {
        serde_json::json!({ "error": "Server error", "kind": "panic" })
    } else {
        let details = if let Some(s) = err.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = err.downcast_ref::<&str>() {
            s.to_string()
        } else {
            "Unknown panic message".to_string()
        };

        serde_json::json!({
            "error": details,
            "kind": "panic",
        })
    };

    let mut response = Response::new(boxed(Full::from(body.to_string())));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    response
}
