//! Contact message storage.

use sqlx::PgPool;

use thriftbox_core::{ContactMessageId, StoreId};

use super::RepositoryError;
use crate::models::NewContactMessage;
use crate::services::contact::ContactStore;

/// Repository for customer contact messages.
pub struct ContactRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ContactRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Whether an active store with this ID exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn store_exists(&self, store_id: StoreId) -> Result<bool, RepositoryError> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM thriftbox.store WHERE id = $1 AND is_active)",
        )
        .bind(store_id)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    /// Store a validated message.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(
        &self,
        message: &NewContactMessage,
    ) -> Result<ContactMessageId, RepositoryError> {
        let (id,): (i32,) = sqlx::query_as(
            r"
            INSERT INTO thriftbox.contact_message
                (store_id, name, email, order_number, subject, message)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            ",
        )
        .bind(message.store_id)
        .bind(&message.name)
        .bind(message.email.as_str())
        .bind(message.order_number.as_deref())
        .bind(&message.subject)
        .bind(&message.message)
        .fetch_one(self.pool)
        .await?;

        Ok(ContactMessageId::new(id))
    }
}

impl ContactStore for ContactRepository<'_> {
    async fn store_exists(&self, store_id: StoreId) -> Result<bool, RepositoryError> {
        Self::store_exists(self, store_id).await
    }

    async fn insert(
        &self,
        message: &NewContactMessage,
    ) -> Result<ContactMessageId, RepositoryError> {
        Self::insert(self, message).await
    }
}
