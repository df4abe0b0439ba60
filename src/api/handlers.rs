use super::error::{ApiError, ApiResult, reply};
use super::extract::Submission;
use super::protocol::*;
use super::validation;
use crate::storage::Storage;

use axum::Extension;
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;
use std::sync::Arc;

pub async fn handle_submit_contact(
    Extension(storage): Extension<Arc<dyn Storage>>,
    Submission(body): Submission,
) -> Response {
    reply(submit_contact(storage.as_ref(), &body).await)
}

pub async fn handle_subscribe(
    Extension(storage): Extension<Arc<dyn Storage>>,
    Submission(body): Submission,
) -> Response {
    reply(subscribe(storage.as_ref(), &body).await)
}

/// Answers every `/api` path that has no route, so it never reaches the asset server.
pub async fn handle_api_not_found() -> ApiError {
    ApiError::NotFound
}

pub async fn submit_contact(
    storage: &dyn Storage,
    body: &Value,
) -> ApiResult<(StatusCode, ContactResponse)> {
    let input = validation::contact_request(body)?;
    let request = storage.create_contact_request(input).await?;

    tracing::info!("Stored contact request {}", request.id);

    Ok((
        StatusCode::CREATED,
        ContactResponse {
            message: MSG_CONTACT_CREATED.to_string(),
            id: request.id,
        },
    ))
}

pub async fn subscribe(
    storage: &dyn Storage,
    body: &Value,
) -> ApiResult<(StatusCode, SubscribeResponse)> {
    let input = validation::newsletter_subscription(body)?;
    let (subscription, created) = storage.subscribe_if_absent(input).await?;

    if !created {
        tracing::debug!("Subscription {} already exists", subscription.id);
        return Ok((
            StatusCode::OK,
            SubscribeResponse {
                message: MSG_ALREADY_SUBSCRIBED.to_string(),
                subscribed: true,
            },
        ));
    }

    tracing::info!("Stored newsletter subscription {}", subscription.id);

    Ok((
        StatusCode::CREATED,
        SubscribeResponse {
            message: MSG_SUBSCRIBED.to_string(),
            subscribed: true,
        },
    ))
}
