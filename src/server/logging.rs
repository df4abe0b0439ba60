//! Logging
//!
//! Process-wide tracing setup and the request logger that records one line
//! per API call: method, path, status, duration and the JSON body that was
//! sent back, cut to a fixed width.

use crate::api::protocol::API_PREFIX;

use axum::body::{Body, to_bytes};
use axum::extract::Request;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use std::time::{Duration, Instant};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Longest log line emitted by the request logger, ellipsis included.
pub const MAX_LOG_LINE: usize = 80;

const DEFAULT_FILTER: &str = "contact_intake=info,tower_http=warn";

pub fn init_subscriber() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();
}

/// Middleware logging every request whose path starts with `/api`.
pub async fn log_api_requests(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    if !path.starts_with(API_PREFIX) {
        return next.run(request).await;
    }

    let method = request.method().clone();
    let started = Instant::now();
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!("Failed to buffer response body for {}: {}", path, e);
            let mut failed = Response::new(Body::empty());
            *failed.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            return failed;
        }
    };

    let is_json = parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));
    let json_body = if is_json {
        std::str::from_utf8(&bytes).ok()
    } else {
        None
    };

    let line = format_log_line(&method, &path, parts.status, started.elapsed(), json_body);
    tracing::info!(source = "http", "{}", line);

    Response::from_parts(parts, Body::from(bytes))
}

/// `<METHOD> <path> <status> in <ms>ms[ :: <body>]`, truncated to `MAX_LOG_LINE`.
pub fn format_log_line(
    method: &Method,
    path: &str,
    status: StatusCode,
    elapsed: Duration,
    json_body: Option<&str>,
) -> String {
    let mut line = format!(
        "{} {} {} in {}ms",
        method,
        path,
        status.as_u16(),
        elapsed.as_millis()
    );
    if let Some(body) = json_body {
        line.push_str(" :: ");
        line.push_str(body);
    }
    truncate_line(line)
}

fn truncate_line(line: String) -> String {
    if line.chars().count() <= MAX_LOG_LINE {
        return line;
    }
    let mut cut: String = line.chars().take(MAX_LOG_LINE - 1).collect();
    cut.push('…');
    cut
}
