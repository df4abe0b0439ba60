//! Submission API Protocol
//!
//! Defines the public endpoints and the JSON envelopes they answer with.
//! Every response body carries a human-readable `message`; the remaining
//! fields depend on the endpoint and the outcome.

use crate::storage::types::RecordId;
use serde::{Deserialize, Serialize};

// --- API Endpoints ---

/// Prefix shared by every API route. Paths under it are never served by the asset server.
pub const API_PREFIX: &str = "/api";
/// Public endpoint for contact-form submissions.
pub const ENDPOINT_CONTACT: &str = "/api/contact";
/// Public endpoint for newsletter sign-ups.
pub const ENDPOINT_SUBSCRIBE: &str = "/api/subscribe";

// --- Envelope messages ---

pub const MSG_CONTACT_CREATED: &str = "Contact request submitted successfully";
pub const MSG_SUBSCRIBED: &str = "Newsletter subscription successful";
pub const MSG_ALREADY_SUBSCRIBED: &str = "Email already subscribed";
pub const MSG_VALIDATION_ERROR: &str = "Validation error";
pub const MSG_INTERNAL_ERROR: &str = "Internal server error";
pub const MSG_NOT_FOUND: &str = "Not found";

// --- Data Transfer Objects ---

/// Answer to a stored contact request (`201`).
#[derive(Debug, Serialize, Deserialize)]
pub struct ContactResponse {
    pub message: String,
    /// Identifier assigned by the contact request collection.
    pub id: RecordId,
}

/// Answer to a subscription attempt (`200` when the email was already known, `201` otherwise).
#[derive(Debug, Serialize, Deserialize)]
pub struct SubscribeResponse {
    pub message: String,
    pub subscribed: bool,
}

/// One field-level validation problem.
///
/// `path` lists the keys leading to the offending value; it is empty when the
/// body itself has the wrong shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub path: Vec<String>,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            path: vec![field.to_string()],
            message: message.into(),
        }
    }

    pub fn root(message: impl Into<String>) -> Self {
        Self {
            path: Vec::new(),
            message: message.into(),
        }
    }
}

/// Body of every non-success response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    /// Present only for validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldIssue>>,
}
