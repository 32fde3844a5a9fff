//! Access log lines
//!
//! `common` is the NCSA common log format, `combined` appends the referer
//! placeholder, user agent and request time in seconds, and `json` writes
//! the whole entry as one object per line. Unrecognised names mean `combined`.

use chrono::{DateTime, Local};
use hyper::header::USER_AGENT;
use hyper::{Request, Version};
use serde::Serialize;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLogFormat {
    Common,
    Combined,
    Json,
}

impl AccessLogFormat {
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "common" => Self::Common,
            "json" => Self::Json,
            _ => Self::Combined,
        }
    }
}

/// One served request
#[derive(Debug, Clone, Serialize)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    #[serde(serialize_with = "rfc3339")]
    pub time: DateTime<Local>,
    pub method: String,
    pub path: String,
    pub http_version: &'static str,
    pub status: u16,
    pub body_bytes: u64,
    pub user_agent: Option<String>,
    pub request_time_us: u64,
}

fn rfc3339<S: serde::Serializer>(time: &DateTime<Local>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&time.to_rfc3339())
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2.0",
        Version::HTTP_3 => "3.0",
        _ => "1.1",
    }
}

impl AccessLogEntry {
    /// Capture the request side before the request is consumed by routing
    pub fn from_request<B>(req: &Request<B>, peer: SocketAddr) -> Self {
        Self {
            remote_addr: peer.ip().to_string(),
            time: Local::now(),
            method: req.method().to_string(),
            path: req.uri().path().to_string(),
            http_version: version_label(req.version()),
            status: 0,
            body_bytes: 0,
            user_agent: req
                .headers()
                .get(USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string),
            request_time_us: 0,
        }
    }

    /// Fill in the response side
    pub fn finish(&mut self, status: u16, body_bytes: u64, elapsed: Duration) {
        self.status = status;
        self.body_bytes = body_bytes;
        self.request_time_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
    }

    pub fn render(&self, format: AccessLogFormat) -> String {
        match format {
            AccessLogFormat::Common => self.common(),
            AccessLogFormat::Combined => format!(
                "{} \"-\" \"{}\" {:.3}",
                self.common(),
                self.user_agent.as_deref().unwrap_or("-"),
                self.request_time_us as f64 / 1_000_000.0,
            ),
            AccessLogFormat::Json => serde_json::to_string(self)
                .unwrap_or_else(|e| format!("{{\"log_error\":\"{e}\"}}")),
        }
    }

    fn common(&self) -> String {
        format!(
            "{} - - [{}] \"{} {} HTTP/{}\" {} {}",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.path,
            self.http_version,
            self.status,
            self.body_bytes,
        )
    }
}
