use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Server-side login record. The browser only holds a signed reference to `id`.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
