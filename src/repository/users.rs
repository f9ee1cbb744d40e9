use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::{map_unique_violation, AppError};
use crate::models::user::{NewUser, User, UserChanges};

pub const EMAIL_TAKEN: &str = "El email ya está registrado";

const USER_COLUMNS: &str = "id, name, email, password_hash, phone, address, company, tax_id, \
                            role, status, created_at, updated_at";

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users, newest registration first.
    async fn list(&self) -> Result<Vec<User>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Case-insensitive lookup.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Fails with `Conflict` when the email is already registered.
    async fn insert(&self, user: NewUser) -> Result<User, AppError>;

    /// Returns `None` when no row has that id.
    async fn update(&self, id: i64, changes: UserChanges) -> Result<Option<User>, AppError>;

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool, AppError>;

    /// Number of rows removed.
    async fn delete(&self, id: i64) -> Result<u64, AppError>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn list(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password_hash, phone, address, company, tax_id, role, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone)
        .bind(&user.address)
        .bind(&user.company)
        .bind(&user.tax_id)
        .bind(user.role.as_str())
        .bind(user.status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, EMAIL_TAKEN))
    }

    async fn update(&self, id: i64, changes: UserChanges) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = CASE WHEN $4 THEN $5 ELSE phone END,
                address = CASE WHEN $6 THEN $7 ELSE address END,
                company = CASE WHEN $8 THEN $9 ELSE company END,
                tax_id = CASE WHEN $10 THEN $11 ELSE tax_id END,
                role = COALESCE($12, role),
                status = COALESCE($13, status),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.email)
        .bind(changes.phone.is_some())
        .bind(changes.phone.flatten())
        .bind(changes.address.is_some())
        .bind(changes.address.flatten())
        .bind(changes.company.is_some())
        .bind(changes.company.flatten())
        .bind(changes.tax_id.is_some())
        .bind(changes.tax_id.flatten())
        .bind(changes.role.map(|r| r.as_str()))
        .bind(changes.status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, EMAIL_TAKEN))
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
