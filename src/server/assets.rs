//! Front-end Asset Serving
//!
//! Everything outside `/api` belongs to the front-end. Two modes:
//! - **Static**: serve the built bundle from disk, falling back to `index.html`
//!   so client-side routes resolve.
//! - **Proxy**: forward the request to a running development asset server and
//!   relay its answer.

use axum::body::{Body, Bytes, to_bytes};
use axum::extract::Request;
use axum::http::{HeaderMap, HeaderName, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json, Router};
use reqwest::Url;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::services::{ServeDir, ServeFile};

use crate::api::protocol::ErrorResponse;

const PROXY_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_PROXY_BODY: usize = 16 * 1024 * 1024;

/// Headers that describe a single connection and must not be forwarded.
const HOP_BY_HOP: [HeaderName; 6] = [
    header::CONNECTION,
    header::HOST,
    header::TRANSFER_ENCODING,
    header::CONTENT_LENGTH,
    header::UPGRADE,
    header::TE,
];

#[derive(Debug, Clone, PartialEq)]
pub enum AssetMode {
    Static { public_dir: PathBuf },
    Proxy { upstream: Url },
}

/// Builds a router whose fallback serves front-end assets in the given mode.
///
/// Fails if static mode points at a directory that does not exist.
pub fn router(mode: &AssetMode) -> anyhow::Result<Router> {
    match mode {
        AssetMode::Static { public_dir } => {
            if !public_dir.is_dir() {
                anyhow::bail!(
                    "Could not find the build directory: {}, make sure to build the client first",
                    public_dir.display()
                );
            }
            tracing::info!("Serving static assets from {}", public_dir.display());
            let index = ServeFile::new(public_dir.join("index.html"));
            Ok(Router::new().fallback_service(ServeDir::new(public_dir).fallback(index)))
        }
        AssetMode::Proxy { upstream } => {
            tracing::info!("Proxying assets to development server at {}", upstream);
            let proxy = DevProxy::new(upstream.clone())?;
            Ok(Router::new()
                .fallback(handle_proxy)
                .layer(Extension(Arc::new(proxy))))
        }
    }
}

pub struct DevProxy {
    upstream: Url,
    client: reqwest::Client,
}

impl DevProxy {
    pub fn new(upstream: Url) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(PROXY_TIMEOUT)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { upstream, client })
    }

    /// Upstream URL for a request path and optional query string.
    ///
    /// Scheme, host and port always come from the upstream; the request path
    /// is appended to the upstream's base path.
    pub fn target(&self, path_and_query: &str) -> Url {
        let (path, query) = match path_and_query.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path_and_query, None),
        };
        let base = self.upstream.path().trim_end_matches('/');

        let mut url = self.upstream.clone();
        url.set_path(&format!("{}/{}", base, path.trim_start_matches('/')));
        url.set_query(query);
        url.set_fragment(None);
        url
    }

    async fn forward(&self, request: Request) -> anyhow::Result<Response> {
        let (parts, body) = request.into_parts();
        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let url = self.target(path_and_query);
        let body: Bytes = to_bytes(body, MAX_PROXY_BODY).await?;

        let upstream = self
            .client
            .request(parts.method, url)
            .headers(strip_hop_by_hop(parts.headers))
            .body(body)
            .send()
            .await?;

        let status = upstream.status();
        let headers = strip_hop_by_hop(upstream.headers().clone());
        let bytes = upstream.bytes().await?;

        let mut response = Response::new(Body::from(bytes));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }
}

fn strip_hop_by_hop(mut headers: HeaderMap) -> HeaderMap {
    for name in HOP_BY_HOP.iter() {
        headers.remove(name);
    }
    headers
}

async fn handle_proxy(Extension(proxy): Extension<Arc<DevProxy>>, request: Request) -> Response {
    let path = request.uri().path().to_string();
    match proxy.forward(request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Asset proxy failed for {}: {:#}", path, e);
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    message: "Asset server unavailable".to_string(),
                    errors: None,
                }),
            )
                .into_response()
        }
    }
}
