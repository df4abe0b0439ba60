//! Submission API Module
//!
//! The request-handling layer between HTTP and the store.
//!
//! ## Workflow
//! 1. **Extract**: the body is read as JSON or a url-encoded form into an untyped value.
//! 2. **Validate**: the endpoint schema turns it into a typed insert payload or a list of field issues.
//! 3. **Persist**: the store is called only once validation has fully passed.
//! 4. **Reply**: `error::reply` maps the outcome to a status and JSON envelope.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod protocol;
pub mod validation;

use axum::Router;
use axum::routing::{any, post};
use handlers::{handle_api_not_found, handle_submit_contact, handle_subscribe};
use protocol::{API_PREFIX, ENDPOINT_CONTACT, ENDPOINT_SUBSCRIBE};

/// Routes for every path under `/api`. Expects an `Arc<dyn Storage>` extension.
///
/// Unsupported methods on a known endpoint get the same JSON 404 as an
/// unknown path.
pub fn routes() -> Router {
    Router::new()
        .route(
            ENDPOINT_CONTACT,
            post(handle_submit_contact).fallback(handle_api_not_found),
        )
        .route(
            ENDPOINT_SUBSCRIBE,
            post(handle_subscribe).fallback(handle_api_not_found),
        )
        .route(API_PREFIX, any(handle_api_not_found))
        .route(&format!("{}/*rest", API_PREFIX), any(handle_api_not_found))
}

#[cfg(test)]
mod tests;
