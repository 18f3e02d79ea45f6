//! Customer contact messages.

use std::future::Future;

use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use thriftbox_core::{ContactMessageId, Email, EmailError, StoreId};

use crate::db::RepositoryError;
use crate::models::NewContactMessage;

const MAX_NAME_LENGTH: usize = 200;
const MAX_SUBJECT_LENGTH: usize = 200;
const MAX_MESSAGE_LENGTH: usize = 5000;
const MAX_ORDER_NUMBER_LENGTH: usize = 64;

/// Reasons a contact message is refused.
#[derive(Debug, Error)]
pub enum ContactError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("{field} is too long (max {max} characters)")]
    TooLong { field: &'static str, max: usize },

    #[error("store not found")]
    StoreNotFound,

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// Raw form body. Every field is optional here so that a missing field is
/// reported by name instead of as a generic parse failure.
#[derive(Debug, Default, Deserialize)]
pub struct ContactForm {
    pub store_id: Option<StoreId>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub order_number: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

fn required(
    value: Option<&String>,
    field: &'static str,
    max: usize,
) -> Result<String, ContactError> {
    let value = value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .ok_or(ContactError::MissingField(field))?;
    if value.chars().count() > max {
        return Err(ContactError::TooLong { field, max });
    }
    Ok(value.to_string())
}

impl ContactForm {
    /// Check the form and produce a message ready to store.
    ///
    /// # Errors
    ///
    /// Returns `MissingField`, `InvalidEmail` or `TooLong`.
    pub fn validate(&self) -> Result<NewContactMessage, ContactError> {
        let store_id = self.store_id.ok_or(ContactError::MissingField("store_id"))?;
        let name = required(self.name.as_ref(), "name", MAX_NAME_LENGTH)?;
        let email = self
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or(ContactError::MissingField("email"))?;
        let email = Email::parse(email)?;
        let subject = required(self.subject.as_ref(), "subject", MAX_SUBJECT_LENGTH)?;
        let message = required(self.message.as_ref(), "message", MAX_MESSAGE_LENGTH)?;

        let order_number = self
            .order_number
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(String::from);
        if order_number
            .as_ref()
            .is_some_and(|n| n.len() > MAX_ORDER_NUMBER_LENGTH)
        {
            return Err(ContactError::TooLong {
                field: "order_number",
                max: MAX_ORDER_NUMBER_LENGTH,
            });
        }

        Ok(NewContactMessage {
            store_id,
            name,
            email,
            order_number,
            subject,
            message,
        })
    }
}

/// Storage for contact messages.
pub trait ContactStore: Sync {
    /// Whether an active store with this ID exists.
    fn store_exists(
        &self,
        store_id: StoreId,
    ) -> impl Future<Output = Result<bool, RepositoryError>> + Send;

    fn insert(
        &self,
        message: &NewContactMessage,
    ) -> impl Future<Output = Result<ContactMessageId, RepositoryError>> + Send;
}

/// Validate and store a contact message.
///
/// # Errors
///
/// See [`ContactError`]. Nothing is stored unless the form validates and the
/// store exists.
#[instrument(skip(repo, form), fields(store_id = ?form.store_id))]
pub async fn submit<S: ContactStore>(
    repo: &S,
    form: &ContactForm,
) -> Result<ContactMessageId, ContactError> {
    let message = form.validate()?;

    if !repo.store_exists(message.store_id).await? {
        return Err(ContactError::StoreNotFound);
    }

    let id = repo.insert(&message).await?;
    tracing::info!(message_id = %id, "Contact message received");
    Ok(id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct MemoryInbox {
        stores: Vec<StoreId>,
        messages: Mutex<Vec<NewContactMessage>>,
    }

    impl MemoryInbox {
        fn with_store(id: i32) -> Self {
            Self {
                stores: vec![StoreId::new(id)],
                ..Self::default()
            }
        }

        fn count(&self) -> usize {
            self.messages.lock().unwrap().len()
        }
    }

    impl ContactStore for MemoryInbox {
        async fn store_exists(&self, store_id: StoreId) -> Result<bool, RepositoryError> {
            Ok(self.stores.contains(&store_id))
        }

        async fn insert(
            &self,
            message: &NewContactMessage,
        ) -> Result<ContactMessageId, RepositoryError> {
            let mut messages = self.messages.lock().unwrap();
            messages.push(message.clone());
            Ok(ContactMessageId::new(i32::try_from(messages.len()).unwrap()))
        }
    }

    fn form() -> ContactForm {
        ContactForm {
            store_id: Some(StoreId::new(1)),
            name: Some("Ada".to_string()),
            email: Some("Ada@Example.com".to_string()),
            order_number: Some("  ".to_string()),
            subject: Some("Where is my parcel?".to_string()),
            message: Some("Ordered last week.".to_string()),
        }
    }

    #[tokio::test]
    async fn test_submit_stores_message() {
        let inbox = MemoryInbox::with_store(1);
        let id = submit(&inbox, &form()).await.unwrap();

        assert_eq!(id, ContactMessageId::new(1));
        let stored = inbox.messages.lock().unwrap();
        assert_eq!(stored[0].email.as_str(), "ada@example.com");
        assert_eq!(stored[0].order_number, None);
    }

    #[tokio::test]
    async fn test_missing_email_rejected_before_insert() {
        let inbox = MemoryInbox::with_store(1);
        let err = submit(
            &inbox,
            &ContactForm {
                email: None,
                ..form()
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ContactError::MissingField("email")));
        assert_eq!(inbox.count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let inbox = MemoryInbox::with_store(1);
        let err = submit(
            &inbox,
            &ContactForm {
                email: Some("not-an-address".to_string()),
                ..form()
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ContactError::InvalidEmail(_)));
        assert_eq!(inbox.count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_store_is_not_found() {
        let inbox = MemoryInbox::with_store(2);
        let err = submit(&inbox, &form()).await.unwrap_err();
        assert!(matches!(err, ContactError::StoreNotFound));
        assert_eq!(inbox.count(), 0);
    }

    #[test]
    fn test_each_required_field_reported() {
        let cases: [(ContactForm, &str); 4] = [
            (ContactForm { store_id: None, ..form() }, "store_id"),
            (ContactForm { name: None, ..form() }, "name"),
            (ContactForm { subject: Some(String::new()), ..form() }, "subject"),
            (ContactForm { message: None, ..form() }, "message"),
        ];
        for (input, field) in cases {
            let err = input.validate().unwrap_err();
            assert!(
                matches!(err, ContactError::MissingField(f) if f == field),
                "expected missing {field}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_overlong_message_rejected() {
        let err = ContactForm {
            message: Some("x".repeat(MAX_MESSAGE_LENGTH + 1)),
            ..form()
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, ContactError::TooLong { field: "message", .. }));
    }
}
