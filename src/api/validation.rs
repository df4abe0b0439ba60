//! Submission Schemas
//!
//! Turns an untyped request body into the typed insert payload of a store
//! collection, or into the ordered list of problems that prevented it.
//! Issues are reported in schema field order, one per field.

use super::protocol::FieldIssue;
use crate::storage::types::{NewContactRequest, NewNewsletterSubscription};

use serde_json::{Map, Value};
use validator::ValidateEmail;

pub type Validated<T> = Result<T, Vec<FieldIssue>>;

/// Contact form schema: every field is a required, non-empty string.
pub fn contact_request(body: &Value) -> Validated<NewContactRequest> {
    let mut fields = Fields::new(body)?;

    let input = NewContactRequest {
        first_name: fields.text("firstName"),
        last_name: fields.text("lastName"),
        email: fields.email("email"),
        phone: fields.text("phone"),
        company: fields.text("company"),
        service: fields.text("service"),
        message: fields.text("message"),
    };

    fields.finish(input)
}

/// Newsletter schema: a single required email address.
pub fn newsletter_subscription(body: &Value) -> Validated<NewNewsletterSubscription> {
    let mut fields = Fields::new(body)?;

    let input = NewNewsletterSubscription {
        email: fields.email("email"),
    };

    fields.finish(input)
}

/// Reads fields out of a JSON object while collecting issues.
///
/// Failed reads yield an empty string so the caller can keep building its
/// struct; `finish` discards it if any issue was recorded.
struct Fields<'a> {
    object: &'a Map<String, Value>,
    issues: Vec<FieldIssue>,
}

impl<'a> Fields<'a> {
    fn new(body: &'a Value) -> Validated<Self> {
        match body {
            Value::Object(object) => Ok(Self {
                object,
                issues: Vec::new(),
            }),
            other => Err(vec![FieldIssue::root(format!(
                "Expected object, received {}",
                json_type(other)
            ))]),
        }
    }

    fn text(&mut self, name: &str) -> String {
        match self.object.get(name) {
            None => self.reject(name, "Required"),
            Some(Value::String(value)) if value.is_empty() => {
                self.reject(name, "Must not be empty")
            }
            Some(Value::String(value)) => value.clone(),
            Some(other) => {
                let message = format!("Expected string, received {}", json_type(other));
                self.reject(name, message)
            }
        }
    }

    fn email(&mut self, name: &str) -> String {
        let issues_before = self.issues.len();
        let value = self.text(name);
        if self.issues.len() > issues_before {
            return value;
        }
        if !value.validate_email() {
            return self.reject(name, "Invalid email");
        }
        value
    }

    fn reject(&mut self, name: &str, message: impl Into<String>) -> String {
        self.issues.push(FieldIssue::new(name, message));
        String::new()
    }

    fn finish<T>(self, value: T) -> Validated<T> {
        if self.issues.is_empty() {
            Ok(value)
        } else {
            Err(self.issues)
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
