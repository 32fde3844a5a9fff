//! HTTP response building module
//!
//! JSON response builders, decoupled from the word-cloud logic.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

const JSON: &str = "application/json";
/// Methods accepted on the generation endpoint
pub const GENERATE_METHODS: &str = "POST, OPTIONS";
/// Methods accepted on the health probes
pub const HEALTH_METHODS: &str = "GET, HEAD";

/// Serialize `body` and build a JSON response with `status`
pub fn build_json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let payload = match serde_json::to_vec(body) {
        Ok(bytes) => bytes,
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response body: {e}"));
            return build_error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    };
    let content_length = payload.len();

    Response::builder()
        .status(status)
        .header("Content-Type", JSON)
        .header("Content-Length", content_length)
        .body(Full::new(Bytes::from(payload)))
        .unwrap_or_else(|e| {
            log_build_error(status, &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// `{"success": false, "error": message}`
pub fn build_error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let body = format!(
        "{{\"success\":false,\"error\":{}}}",
        serde_json::Value::from(message)
    );
    Response::builder()
        .status(status)
        .header("Content-Type", JSON)
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            log_build_error(status, &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_error_response(StatusCode::NOT_FOUND, "Not Found")
}

/// Build 405 Method Not Allowed response listing what the path does accept
pub fn build_405_response(allowed: &'static str) -> Response<Full<Bytes>> {
    let mut response = build_error_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
    response
        .headers_mut()
        .insert("Allow", hyper::header::HeaderValue::from_static(allowed));
    response
}

/// Build 413 Payload Too Large response
pub fn build_413_response(limit: u64) -> Response<Full<Bytes>> {
    build_error_response(
        StatusCode::PAYLOAD_TOO_LARGE,
        &format!("Request body exceeds {limit} bytes"),
    )
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(enable_cors: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Allow", GENERATE_METHODS);

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", GENERATE_METHODS)
            .header("Access-Control-Allow-Headers", "Content-Type")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error(StatusCode::NO_CONTENT, &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build health probe response
pub fn build_health_response() -> Response<Full<Bytes>> {
    build_json_response(StatusCode::OK, &serde_json::json!({ "status": "ok" }))
}

/// Log response build error
fn log_build_error(status: StatusCode, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response<Full<Bytes>>) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_error_response_escapes_message() {
        let response = build_error_response(StatusCode::BAD_REQUEST, "bad \"quote\"\n");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()["Content-Type"], JSON);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "bad \"quote\"\n");
    }

    #[tokio::test]
    async fn test_405_lists_allowed_methods() {
        let response = build_405_response(GENERATE_METHODS);
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()["Allow"], GENERATE_METHODS);
        assert_eq!(build_405_response(HEALTH_METHODS).headers()["Allow"], "GET, HEAD");
        assert_eq!(body_json(response).await["success"], false);
    }

    #[test]
    fn test_options_cors_headers_only_when_enabled() {
        let plain = build_options_response(false);
        assert_eq!(plain.status(), StatusCode::NO_CONTENT);
        assert!(!plain.headers().contains_key("Access-Control-Allow-Origin"));

        let cors = build_options_response(true);
        assert_eq!(cors.headers()["Access-Control-Allow-Origin"], "*");
    }

    #[tokio::test]
    async fn test_health_body() {
        let body = body_json(build_health_response()).await;
        assert_eq!(body, serde_json::json!({ "status": "ok" }));
    }
}
