//! Word-cloud generation endpoint
//!
//! Reads a size-limited JSON body, runs the pipeline on the blocking pool and
//! answers with the saved image's absolute path and verified size.

use crate::config::AppState;
use crate::http;
use crate::logger;
use crate::wordcloud::{GeneratedImage, WordCloudError};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const GENERATE_PATH: &str = "/generate_wordcloud";

/// Request body; `text` missing, `null` and `""` are all treated as missing
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerateResponse {
    fn success(image: &GeneratedImage) -> Self {
        Self {
            success: true,
            image_path: Some(image.path.to_string_lossy().into_owned()),
            file_size: Some(image.file_size),
            error: None,
        }
    }

    fn failure(error: &WordCloudError) -> Self {
        Self {
            success: false,
            image_path: None,
            file_size: None,
            error: Some(error.to_string()),
        }
    }
}

/// POST /generate_wordcloud
pub async fn handle_generate<B>(
    req: Request<B>,
    state: &Arc<AppState>,
    peer: &str,
) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let limit = state.config.http.max_body_size;
    if let Some(resp) = check_body_size(&req, limit) {
        return resp;
    }

    let limited = Limited::new(req.into_body(), usize::try_from(limit).unwrap_or(usize::MAX));
    let body = match limited.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_warning(&format!("Request body from {peer} exceeds {limit} bytes"));
            return http::build_413_response(limit);
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body from {peer}: {e}"));
            return http::build_error_response(
                StatusCode::BAD_REQUEST,
                &format!("Failed to read request body: {e}"),
            );
        }
    };

    let (status, response) = generate_from_body(&body, Arc::clone(state), peer).await;
    http::build_json_response(status, &response)
}

/// Reject early when Content-Length already exceeds the limit
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let size = req
        .headers()
        .get(hyper::header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse::<u64>()
        .ok()?;
    if size > max_body_size {
        logger::log_warning(&format!(
            "Request body too large: {size} bytes (max: {max_body_size})"
        ));
        return Some(http::build_413_response(max_body_size));
    }
    None
}

/// Validate the body, then generate. Input errors map to 400, everything
/// else to 500.
pub async fn generate_from_body(
    body: &[u8],
    state: Arc<AppState>,
    peer: &str,
) -> (StatusCode, GenerateResponse) {
    let text = match parse_request(body) {
        Ok(text) => text,
        Err(e) => return failure(&e),
    };
    logger::log_wordcloud_received(peer, text.chars().count());

    let result = tokio::task::spawn_blocking(move || state.wordcloud.generate(&text))
        .await
        .unwrap_or_else(|e| Err(WordCloudError::Render(e.to_string())));

    match result {
        Ok(image) => (StatusCode::OK, GenerateResponse::success(&image)),
        Err(e) => failure(&e),
    }
}

fn parse_request(body: &[u8]) -> Result<String, WordCloudError> {
    let request: GenerateRequest = serde_json::from_slice(body)?;
    match request.text {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(WordCloudError::MissingText),
    }
}

fn failure(error: &WordCloudError) -> (StatusCode, GenerateResponse) {
    logger::log_wordcloud_failed(error);
    let status = if error.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, GenerateResponse::failure(error))
}
