//! Storage Interface
//!
//! The contract between the request handlers and whatever owns the records.
//! Handlers receive an `Arc<dyn Storage>` and never reach for global state.
//!
//! A lookup that finds nothing returns `Ok(None)`. `Err` is reserved for a
//! backend that genuinely failed; the in-memory store never produces one.

use super::types::*;

use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_account(&self, id: RecordId) -> Result<Option<Account>>;

    /// First account with exactly this username, in insertion order.
    async fn get_account_by_username(&self, username: &str) -> Result<Option<Account>>;

    /// Stores a new account. Does not check username uniqueness; callers
    /// must look the name up first.
    async fn create_account(&self, input: NewAccount) -> Result<Account>;

    async fn get_contact_request(&self, id: RecordId) -> Result<Option<ContactRequest>>;

    async fn list_contact_requests(&self) -> Result<Vec<ContactRequest>>;

    /// Stamps `id`, `created_at` and `is_processed = false`.
    async fn create_contact_request(&self, input: NewContactRequest) -> Result<ContactRequest>;

    async fn mark_contact_request_processed(&self, id: RecordId)
    -> Result<Option<ContactRequest>>;

    async fn get_newsletter_subscription(
        &self,
        id: RecordId,
    ) -> Result<Option<NewsletterSubscription>>;

    async fn get_newsletter_subscription_by_email(
        &self,
        email: &str,
    ) -> Result<Option<NewsletterSubscription>>;

    async fn list_newsletter_subscriptions(&self) -> Result<Vec<NewsletterSubscription>>;

    /// Stamps `id`, `created_at` and `is_active = true`.
    async fn create_newsletter_subscription(
        &self,
        input: NewNewsletterSubscription,
    ) -> Result<NewsletterSubscription>;

    /// Sets `is_active` to the given value. This is not a flip.
    async fn toggle_newsletter_subscription_status(
        &self,
        id: RecordId,
        is_active: bool,
    ) -> Result<Option<NewsletterSubscription>>;

    /// Returns the subscription for this email, creating it if none exists.
    ///
    /// The boolean is `true` when a new record was written. Existing records
    /// are returned untouched whatever their `is_active` value.
    async fn subscribe_if_absent(
        &self,
        input: NewNewsletterSubscription,
    ) -> Result<(NewsletterSubscription, bool)>;
}
