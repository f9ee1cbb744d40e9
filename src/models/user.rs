use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::text_enum;

text_enum! {
    /// Access tier. `client` is the only spelling accepted for customers.
    Role {
        Admin => "admin",
        Client => "client",
    }
}

text_enum! {
    UserStatus {
        Active => "active",
        Inactive => "inactive",
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub company: Option<String>,
    pub tax_id: Option<String>,
    #[sqlx(try_from = "String")]
    pub role: Role,
    #[sqlx(try_from = "String")]
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

/// Insert payload; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub company: Option<String>,
    pub tax_id: Option<String>,
    pub role: Role,
    pub status: UserStatus,
}

/// Partial update. `None` keeps the stored value; for nullable columns
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub company: Option<Option<String>>,
    pub tax_id: Option<Option<String>>,
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
}
