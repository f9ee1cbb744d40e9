use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::contact::{ContactMessage, NewContactMessage};

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn insert(&self, message: NewContactMessage) -> Result<ContactMessage, AppError>;

    /// Newest first.
    async fn list(&self) -> Result<Vec<ContactMessage>, AppError>;
}

#[derive(Clone)]
pub struct PgContactRepository {
    pool: PgPool,
}

impl PgContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactRepository for PgContactRepository {
    async fn insert(&self, message: NewContactMessage) -> Result<ContactMessage, AppError> {
        let saved = sqlx::query_as::<_, ContactMessage>(
            "INSERT INTO contact_messages (name, email, phone, subject, message)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, name, email, phone, subject, message, created_at",
        )
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.phone)
        .bind(&message.subject)
        .bind(&message.message)
        .fetch_one(&self.pool)
        .await?;
        Ok(saved)
    }

    async fn list(&self) -> Result<Vec<ContactMessage>, AppError> {
        let messages = sqlx::query_as::<_, ContactMessage>(
            "SELECT id, name, email, phone, subject, message, created_at
             FROM contact_messages ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(messages)
    }
}
