use super::store::Storage;
use super::types::*;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// An append-only arena of records keyed by a per-collection counter.
///
/// Record `id` lives at index `id - 1`. The counter and the records share one
/// lock, so an id is handed out and its record inserted in a single step.
pub struct Collection<T> {
    inner: RwLock<Arena<T>>,
}

struct Arena<T> {
    records: Vec<T>,
    next_id: RecordId,
}

impl<T: Clone> Collection<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Arena {
                records: Vec::new(),
                next_id: 1,
            }),
        }
    }

    fn slot(id: RecordId) -> Option<usize> {
        id.checked_sub(1).map(|idx| idx as usize)
    }

    pub async fn get(&self, id: RecordId) -> Option<T> {
        let arena = self.inner.read().await;
        Self::slot(id).and_then(|idx| arena.records.get(idx).cloned())
    }

    /// Linear scan in insertion order, returning the first match.
    pub async fn find<P>(&self, predicate: P) -> Option<T>
    where
        P: Fn(&T) -> bool,
    {
        let arena = self.inner.read().await;
        arena.records.iter().find(|&record| predicate(record)).cloned()
    }

    pub async fn all(&self) -> Vec<T> {
        self.inner.read().await.records.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Assigns the next id, builds the record from it and stores it.
    pub async fn insert_with<F>(&self, build: F) -> T
    where
        F: FnOnce(RecordId) -> T,
    {
        let mut arena = self.inner.write().await;
        Self::push(&mut *arena, build)
    }

    /// Replaces the record at `id` with the value derived from it.
    ///
    /// Returns `None` and leaves the collection untouched if `id` is unknown.
    pub async fn update<F>(&self, id: RecordId, derive: F) -> Option<T>
    where
        F: FnOnce(&T) -> T,
    {
        let mut arena = self.inner.write().await;
        let slot = arena.records.get_mut(Self::slot(id)?)?;
        let updated = derive(slot);
        *slot = updated.clone();
        Some(updated)
    }

    /// Returns the first record matching `predicate`, or inserts a new one.
    ///
    /// The scan and the insert happen under the same write lock. The flag is
    /// `true` when a record was created.
    pub async fn find_or_insert_with<P, F>(&self, predicate: P, build: F) -> (T, bool)
    where
        P: Fn(&T) -> bool,
        F: FnOnce(RecordId) -> T,
    {
        let mut arena = self.inner.write().await;
        if let Some(existing) = arena.records.iter().find(|&record| predicate(record)) {
            return (existing.clone(), false);
        }
        (Self::push(&mut *arena, build), true)
    }

    fn push<F>(arena: &mut Arena<T>, build: F) -> T
    where
        F: FnOnce(RecordId) -> T,
    {
        let id = arena.next_id;
        arena.next_id += 1;
        let record = build(id);
        arena.records.push(record.clone());
        record
    }
}

impl<T: Clone> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-lifetime store holding accounts, contact requests and newsletter
/// subscriptions in three independent collections.
#[derive(Default)]
pub struct MemStorage {
    accounts: Collection<Account>,
    contact_requests: Collection<ContactRequest>,
    subscriptions: Collection<NewsletterSubscription>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemStorage {
    async fn get_account(&self, id: RecordId) -> Result<Option<Account>> {
        Ok(self.accounts.get(id).await)
    }

    async fn get_account_by_username(&self, username: &str) -> Result<Option<Account>> {
        Ok(self
            .accounts
            .find(|account| account.username == username)
            .await)
    }

    async fn create_account(&self, input: NewAccount) -> Result<Account> {
        let account = self
            .accounts
            .insert_with(|id| Account {
                id,
                username: input.username,
                password: input.password,
            })
            .await;
        tracing::debug!("Created account {}", account.id);
        Ok(account)
    }

    async fn get_contact_request(&self, id: RecordId) -> Result<Option<ContactRequest>> {
        Ok(self.contact_requests.get(id).await)
    }

    async fn list_contact_requests(&self) -> Result<Vec<ContactRequest>> {
        Ok(self.contact_requests.all().await)
    }

    async fn create_contact_request(&self, input: NewContactRequest) -> Result<ContactRequest> {
        let request = self
            .contact_requests
            .insert_with(|id| ContactRequest::from_insert(id, input))
            .await;
        tracing::debug!("Created contact request {}", request.id);
        Ok(request)
    }

    async fn mark_contact_request_processed(
        &self,
        id: RecordId,
    ) -> Result<Option<ContactRequest>> {
        Ok(self
            .contact_requests
            .update(id, |request| ContactRequest {
                is_processed: true,
                ..request.clone()
            })
            .await)
    }

    async fn get_newsletter_subscription(
        &self,
        id: RecordId,
    ) -> Result<Option<NewsletterSubscription>> {
        Ok(self.subscriptions.get(id).await)
    }

    async fn get_newsletter_subscription_by_email(
        &self,
        email: &str,
    ) -> Result<Option<NewsletterSubscription>> {
        Ok(self
            .subscriptions
            .find(|subscription| subscription.email == email)
            .await)
    }

    async fn list_newsletter_subscriptions(&self) -> Result<Vec<NewsletterSubscription>> {
        Ok(self.subscriptions.all().await)
    }

    async fn create_newsletter_subscription(
        &self,
        input: NewNewsletterSubscription,
    ) -> Result<NewsletterSubscription> {
        let subscription = self
            .subscriptions
            .insert_with(|id| NewsletterSubscription::from_insert(id, input))
            .await;
        tracing::debug!("Created newsletter subscription {}", subscription.id);
        Ok(subscription)
    }

    async fn toggle_newsletter_subscription_status(
        &self,
        id: RecordId,
        is_active: bool,
    ) -> Result<Option<NewsletterSubscription>> {
        Ok(self
            .subscriptions
            .update(id, |subscription| NewsletterSubscription {
                is_active,
                ..subscription.clone()
            })
            .await)
    }

    async fn subscribe_if_absent(
        &self,
        input: NewNewsletterSubscription,
    ) -> Result<(NewsletterSubscription, bool)> {
        let email = input.email.clone();
        Ok(self
            .subscriptions
            .find_or_insert_with(
                |subscription| subscription.email == email,
                |id| NewsletterSubscription::from_insert(id, input),
            )
            .await)
    }
}
