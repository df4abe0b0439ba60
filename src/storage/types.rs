//! Storage Record Types
//!
//! Defines the three record kinds held by the store, together with the
//! insert payloads used to create them. Server-controlled fields (`id`,
//! `created_at`, status flags) only exist on the stored records, never on the
//! insert payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned by a collection. Starts at 1 and is never reused.
pub type RecordId = u32;

/// A user account.
///
/// The password is kept in memory only and never serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    pub id: RecordId,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    pub username: String,
    pub password: String,
}

/// A submitted contact form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub id: RecordId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub service: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub is_processed: bool,
}

/// Validated contact form fields, as accepted by `create_contact_request`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContactRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub service: String,
    pub message: String,
}

/// A newsletter subscription.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterSubscription {
    pub id: RecordId,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewNewsletterSubscription {
    pub email: String,
}

impl ContactRequest {
    pub(crate) fn from_insert(id: RecordId, input: NewContactRequest) -> Self {
        Self {
            id,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone,
            company: input.company,
            service: input.service,
            message: input.message,
            created_at: Utc::now(),
            is_processed: false,
        }
    }
}

impl NewsletterSubscription {
    pub(crate) fn from_insert(id: RecordId, input: NewNewsletterSubscription) -> Self {
        Self {
            id,
            email: input.email,
            created_at: Utc::now(),
            is_active: true,
        }
    }
}
