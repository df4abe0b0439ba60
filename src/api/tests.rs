//! API Module Tests
//!
//! Exercises validation, handler outcomes and response envelopes without a
//! running server.
//!
//! ## Test Scopes
//! - **Schemas**: field-level issues and their order.
//! - **Handlers**: status codes, envelopes and store side effects.
//! - **Failures**: a store that always errors must surface as a generic 500.

#[cfg(test)]
mod tests {
    use crate::api::error::{ApiError, reply};
    use crate::api::extract::Submission;
    use crate::api::handlers::{handle_submit_contact, handle_subscribe, subscribe};
    use crate::api::protocol::*;
    use crate::api::validation;
    use crate::storage::types::*;
    use crate::storage::{MemStorage, Storage};

    use anyhow::Result;
    use async_trait::async_trait;
    use axum::Extension;
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use axum::response::Response;
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn valid_contact() -> Value {
        json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "phone": "+44 20 7946 0000",
            "company": "Analytical Engines Ltd",
            "service": "consulting",
            "message": "We would like a quote."
        })
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn issue_fields(issues: &[FieldIssue]) -> Vec<String> {
        issues.iter().map(|issue| issue.path.join(".")).collect()
    }

    /// Store whose every operation fails.
    struct BrokenStorage;

    #[async_trait]
    impl Storage for BrokenStorage {
        async fn get_account(&self, _id: RecordId) -> Result<Option<Account>> {
            anyhow::bail!("store offline")
        }
        async fn get_account_by_username(&self, _username: &str) -> Result<Option<Account>> {
            anyhow::bail!("store offline")
        }
        async fn create_account(&self, _input: NewAccount) -> Result<Account> {
            anyhow::bail!("store offline")
        }
        async fn get_contact_request(&self, _id: RecordId) -> Result<Option<ContactRequest>> {
            anyhow::bail!("store offline")
        }
        async fn list_contact_requests(&self) -> Result<Vec<ContactRequest>> {
            anyhow::bail!("store offline")
        }
        async fn create_contact_request(
            &self,
            _input: NewContactRequest,
        ) -> Result<ContactRequest> {
            anyhow::bail!("store offline")
        }
        async fn mark_contact_request_processed(
            &self,
            _id: RecordId,
        ) -> Result<Option<ContactRequest>> {
            anyhow::bail!("store offline")
        }
        async fn get_newsletter_subscription(
            &self,
            _id: RecordId,
        ) -> Result<Option<NewsletterSubscription>> {
            anyhow::bail!("store offline")
        }
        async fn get_newsletter_subscription_by_email(
            &self,
            _email: &str,
        ) -> Result<Option<NewsletterSubscription>> {
            anyhow::bail!("store offline")
        }
        async fn list_newsletter_subscriptions(&self) -> Result<Vec<NewsletterSubscription>> {
            anyhow::bail!("store offline")
        }
        async fn create_newsletter_subscription(
            &self,
            _input: NewNewsletterSubscription,
        ) -> Result<NewsletterSubscription> {
            anyhow::bail!("store offline")
        }
        async fn toggle_newsletter_subscription_status(
            &self,
            _id: RecordId,
            _is_active: bool,
        ) -> Result<Option<NewsletterSubscription>> {
            anyhow::bail!("store offline")
        }
        async fn subscribe_if_absent(
            &self,
            _input: NewNewsletterSubscription,
        ) -> Result<(NewsletterSubscription, bool)> {
            anyhow::bail!("store offline")
        }
    }

    // ============================================================
    // SCHEMA TESTS
    // ============================================================

    #[test]
    fn test_contact_schema_accepts_valid_body() {
        let input = validation::contact_request(&valid_contact()).unwrap();

        assert_eq!(input.first_name, "Ada");
        assert_eq!(input.email, "ada@example.com");
        assert_eq!(input.message, "We would like a quote.");
    }

    #[test]
    fn test_contact_schema_ignores_unknown_fields() {
        let mut body = valid_contact();
        body["newsletter"] = json!(true);

        assert!(validation::contact_request(&body).is_ok());
    }

    #[test]
    fn test_contact_schema_reports_missing_email() {
        let mut body = valid_contact();
        body.as_object_mut().unwrap().remove("email");

        let issues = validation::contact_request(&body).unwrap_err();

        assert_eq!(issues, vec![FieldIssue::new("email", "Required")]);
    }

    #[test]
    fn test_contact_schema_reports_every_field_in_order() {
        let issues = validation::contact_request(&json!({})).unwrap_err();

        assert_eq!(
            issue_fields(&issues),
            vec![
                "firstName",
                "lastName",
                "email",
                "phone",
                "company",
                "service",
                "message"
            ]
        );
        assert!(issues.iter().all(|issue| issue.message == "Required"));
    }

    #[test]
    fn test_contact_schema_rule_messages() {
        let mut body = valid_contact();
        body["firstName"] = json!(42);
        body["lastName"] = json!(null);
        body["phone"] = json!("");
        body["email"] = json!("not-an-email");

        let issues = validation::contact_request(&body).unwrap_err();

        assert_eq!(
            issues,
            vec![
                FieldIssue::new("firstName", "Expected string, received number"),
                FieldIssue::new("lastName", "Expected string, received null"),
                FieldIssue::new("email", "Invalid email"),
                FieldIssue::new("phone", "Must not be empty"),
            ]
        );
    }

    #[test]
    fn test_contact_schema_keeps_whitespace_only_text() {
        let mut body = valid_contact();
        body["company"] = json!("   ");

        let input = validation::contact_request(&body).unwrap();

        assert_eq!(input.company, "   ");
    }

    #[test]
    fn test_schema_rejects_non_object_body() {
        let issues = validation::newsletter_subscription(&json!(["a@b.com"])).unwrap_err();

        assert_eq!(issues.len(), 1);
        assert!(issues[0].path.is_empty());
        assert_eq!(issues[0].message, "Expected object, received array");
    }

    #[test]
    fn test_subscription_schema() {
        let ok = validation::newsletter_subscription(&json!({"email": "reader@example.com"}));
        assert_eq!(ok.unwrap().email, "reader@example.com");

        let bad = validation::newsletter_subscription(&json!({"email": "reader"})).unwrap_err();
        assert_eq!(bad, vec![FieldIssue::new("email", "Invalid email")]);
    }

    // ============================================================
    // RESPONSE MAPPING TESTS
    // ============================================================

    #[tokio::test]
    async fn test_reply_validation_envelope() {
        let result: Result<(StatusCode, ContactResponse), ApiError> =
            Err(ApiError::Validation(vec![FieldIssue::new("email", "Required")]));

        let response = reply(result);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["message"], MSG_VALIDATION_ERROR);
        assert_eq!(body["errors"][0]["path"], json!(["email"]));
        assert_eq!(body["errors"][0]["message"], "Required");
    }

    #[tokio::test]
    async fn test_reply_internal_error_hides_cause() {
        let result: Result<(StatusCode, ContactResponse), ApiError> =
            Err(ApiError::Internal(anyhow::anyhow!("secret connection string")));

        let response = reply(result);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body, json!({"message": MSG_INTERNAL_ERROR}));
    }

    // ============================================================
    // CONTACT HANDLER TESTS
    // ============================================================

    #[tokio::test]
    async fn test_contact_created_and_listed() {
        let storage: Arc<dyn Storage> = Arc::new(MemStorage::new());

        let response =
            handle_submit_contact(Extension(storage.clone()), Submission(valid_contact())).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        assert_eq!(body["message"], MSG_CONTACT_CREATED);
        let id = body["id"].as_u64().unwrap() as RecordId;

        let listed = storage.list_contact_requests().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, id);
        assert!(!listed[0].is_processed);
    }

    #[tokio::test]
    async fn test_contact_missing_email_is_400_and_not_stored() {
        let storage: Arc<dyn Storage> = Arc::new(MemStorage::new());
        let mut payload = valid_contact();
        payload.as_object_mut().unwrap().remove("email");

        let response = handle_submit_contact(Extension(storage.clone()), Submission(payload)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["message"], MSG_VALIDATION_ERROR);
        let errors = body["errors"].as_array().unwrap();
        assert!(errors.iter().any(|e| e["path"] == json!(["email"])));

        assert!(storage.list_contact_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_contact_ids_increase_per_submission() {
        let storage: Arc<dyn Storage> = Arc::new(MemStorage::new());

        for expected in 1..=3u64 {
            let response =
                handle_submit_contact(Extension(storage.clone()), Submission(valid_contact()))
                    .await;
            let body = body_json(response).await;
            assert_eq!(body["id"].as_u64(), Some(expected));
        }
    }

    #[tokio::test]
    async fn test_contact_store_failure_is_generic_500() {
        let storage: Arc<dyn Storage> = Arc::new(BrokenStorage);

        let response = handle_submit_contact(Extension(storage), Submission(valid_contact())).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({"message": MSG_INTERNAL_ERROR}));
    }

    // ============================================================
    // SUBSCRIBE HANDLER TESTS
    // ============================================================

    #[tokio::test]
    async fn test_subscribe_new_email() {
        let storage: Arc<dyn Storage> = Arc::new(MemStorage::new());

        let response = handle_subscribe(
            Extension(storage.clone()),
            Submission(json!({"email": "reader@example.com"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            body_json(response).await,
            json!({"message": MSG_SUBSCRIBED, "subscribed": true})
        );

        let subscriptions = storage.list_newsletter_subscriptions().await.unwrap();
        assert_eq!(subscriptions.len(), 1);
        assert!(subscriptions[0].is_active);
    }

    #[tokio::test]
    async fn test_subscribe_twice_does_not_duplicate() {
        let storage: Arc<dyn Storage> = Arc::new(MemStorage::new());
        let payload = json!({"email": "reader@example.com"});

        let (first, _) = subscribe(storage.as_ref(), &payload).await.unwrap();
        assert_eq!(first, StatusCode::CREATED);

        let response = handle_subscribe(Extension(storage.clone()), Submission(payload)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"message": MSG_ALREADY_SUBSCRIBED, "subscribed": true})
        );

        assert_eq!(storage.list_newsletter_subscriptions().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_subscribe_inactive_email_is_already_subscribed() {
        let storage: Arc<dyn Storage> = Arc::new(MemStorage::new());
        let existing = storage
            .create_newsletter_subscription(NewNewsletterSubscription {
                email: "reader@example.com".to_string(),
            })
            .await
            .unwrap();
        storage
            .toggle_newsletter_subscription_status(existing.id, false)
            .await
            .unwrap();

        let (status, body) = subscribe(storage.as_ref(), &json!({"email": "reader@example.com"}))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::OK);
        assert!(body.subscribed);
        let stored = storage.list_newsletter_subscriptions().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert!(!stored[0].is_active);
    }

    #[tokio::test]
    async fn test_subscribe_invalid_email_is_400() {
        let storage: Arc<dyn Storage> = Arc::new(MemStorage::new());

        let result = subscribe(storage.as_ref(), &json!({"email": 17})).await;

        match result {
            Err(ApiError::Validation(issues)) => {
                assert_eq!(
                    issues,
                    vec![FieldIssue::new("email", "Expected string, received number")]
                );
            }
            other => panic!("expected validation error, got {:?}", other.map(|(s, _)| s)),
        }
        assert!(storage.list_newsletter_subscriptions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_subscribe_store_failure_is_generic_500() {
        let storage: Arc<dyn Storage> = Arc::new(BrokenStorage);

        let response = handle_subscribe(
            Extension(storage),
            Submission(json!({"email": "reader@example.com"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({"message": MSG_INTERNAL_ERROR}));
    }
}
