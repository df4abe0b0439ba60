//! Request body extraction.
//!
//! Submissions arrive either as JSON or as a url-encoded form. Both are
//! normalised into a `serde_json::Value` so a single schema can validate them.
//! Bodies with any other (or no) content type are read as an empty object,
//! which the schemas then report field by field.

use super::error::ApiError;

use axum::async_trait;
use axum::extract::{FromRequest, Request};
use axum::{Form, Json};
use axum::http::header::CONTENT_TYPE;
use serde_json::{Map, Value};

/// The untyped body of a submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission(pub Value);

#[derive(Debug, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Other,
}

fn body_kind(request: &Request) -> BodyKind {
    let Some(content_type) = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return BodyKind::Other;
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if mime == "application/json" || mime.ends_with("+json") {
        BodyKind::Json
    } else if mime == "application/x-www-form-urlencoded" {
        BodyKind::Form
    } else {
        BodyKind::Other
    }
}

#[async_trait]
impl<S> FromRequest<S> for Submission
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        match body_kind(&request) {
            BodyKind::Json => {
                let Json(value) = Json::<Value>::from_request(request, state)
                    .await
                    .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
                Ok(Submission(value))
            }
            BodyKind::Form => {
                let Form(pairs) = Form::<Vec<(String, String)>>::from_request(request, state)
                    .await
                    .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
                let object: Map<String, Value> = pairs
                    .into_iter()
                    .map(|(key, value)| (key, Value::String(value)))
                    .collect();
                Ok(Submission(Value::Object(object)))
            }
            BodyKind::Other => Ok(Submission(Value::Object(Map::new()))),
        }
    }
}
