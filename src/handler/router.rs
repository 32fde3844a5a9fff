//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: route matching, method checks,
//! common response headers and access logging.

use super::wordcloud::{self, GENERATE_PATH};
use crate::config::{AppState, HealthConfig};
use crate::http;
use crate::logger::{self, AccessLogEntry, AccessLogFormat};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, SERVER};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let mut entry = AccessLogEntry::from_request(&req, peer_addr);

    let mut response = route_request(req, &state, peer_addr).await;
    apply_common_headers(&mut response, &state);

    if state.config.logging.access_log {
        let body_bytes = response.body().size_hint().exact().unwrap_or_default();
        entry.finish(response.status().as_u16(), body_bytes, started.elapsed());
        logger::log_access(&entry, AccessLogFormat::parse(&state.config.logging.access_log_format));
    }
    Ok(response)
}

/// Route request based on path and method
async fn route_request<B>(
    req: Request<B>,
    state: &Arc<AppState>,
    peer_addr: SocketAddr,
) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let path = req.uri().path();

    // Health check endpoints (highest priority, always fast)
    if is_health_path(&state.config.routes.health, path) {
        return match method {
            Method::GET | Method::HEAD => http::build_health_response(),
            _ => http::build_405_response(http::HEALTH_METHODS),
        };
    }

    if path != GENERATE_PATH {
        return http::build_404_response();
    }

    match method {
        Method::POST => wordcloud::handle_generate(req, state, &peer_addr.to_string()).await,
        Method::OPTIONS => http::build_options_response(state.config.http.enable_cors),
        other => {
            logger::log_warning(&format!("Method not allowed: {other} {GENERATE_PATH}"));
            http::build_405_response(http::GENERATE_METHODS)
        }
    }
}

fn is_health_path(health: &HealthConfig, path: &str) -> bool {
    health.enabled && (path == health.liveness_path || path == health.readiness_path)
}

fn apply_common_headers(response: &mut Response<Full<Bytes>>, state: &AppState) {
    let headers = response.headers_mut();
    if let Ok(name) = HeaderValue::from_str(&state.config.http.server_name) {
        headers.insert(SERVER, name);
    }
    if state.config.http.enable_cors {
        headers.insert(
            "Access-Control-Allow-Origin",
            HeaderValue::from_static("*"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_state;
    use http_body_util::BodyExt;
    use hyper::StatusCode;

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    fn request(method: Method, path: &str, body: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Full::new(Bytes::from(body.to_string())))
            .unwrap()
    }

    async fn send(state: &Arc<AppState>, req: Request<Full<Bytes>>) -> (StatusCode, serde_json::Value) {
        let response = handle_request(req, Arc::clone(state), peer()).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    fn cleanup(state: &AppState) {
        let _ = std::fs::remove_dir_all(state.wordcloud.output_dir().path());
    }

    #[tokio::test]
    async fn test_post_generates_image() {
        let state = Arc::new(test_state("router-post"));
        let body = serde_json::json!({ "text": "cloud cloud rust tokio hyper rust" }).to_string();
        let (status, json) = send(&state, request(Method::POST, GENERATE_PATH, &body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert!(json["file_size"].as_u64().unwrap() > 0);
        cleanup(&state);
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let state = Arc::new(test_state("router-404"));
        let (status, json) = send(&state, request(Method::GET, "/nope", "")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["success"], false);
        cleanup(&state);
    }

    #[tokio::test]
    async fn test_wrong_method_is_405() {
        let state = Arc::new(test_state("router-405"));
        let response = handle_request(request(Method::GET, GENERATE_PATH, ""), Arc::clone(&state), peer())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()["Allow"], "POST, OPTIONS");
        assert!(response.headers().contains_key(SERVER));
        cleanup(&state);
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let state = Arc::new(test_state("router-health"));
        for path in ["/healthz", "/readyz"] {
            let (status, json) = send(&state, request(Method::GET, path, "")).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(json["status"], "ok");
        }
        cleanup(&state);
    }

    #[tokio::test]
    async fn test_wrong_method_on_health_lists_get_head() {
        let state = Arc::new(test_state("router-health-405"));
        let response = handle_request(request(Method::POST, "/healthz", "{}"), Arc::clone(&state), peer())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()["Allow"], "GET, HEAD");
        cleanup(&state);
    }

    #[tokio::test]
    async fn test_oversized_body_is_413() {
        let mut app = test_state("router-413");
        app.config.http.max_body_size = 16;
        let state = Arc::new(app);
        let body = serde_json::json!({ "text": "this body is clearly longer than sixteen bytes" }).to_string();
        let (status, json) = send(&state, request(Method::POST, GENERATE_PATH, &body)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(json["success"], false);
        cleanup(&state);
    }

    #[tokio::test]
    async fn test_options_preflight() {
        let mut app = test_state("router-options");
        app.config.http.enable_cors = true;
        let state = Arc::new(app);
        let response = handle_request(request(Method::OPTIONS, GENERATE_PATH, ""), Arc::clone(&state), peer())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()["Access-Control-Allow-Origin"], "*");
        cleanup(&state);
    }
}
