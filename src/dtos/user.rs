use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::user::{Role, User, UserStatus};

/// Admin-side creation. Presence of `nombre`, `email` and `password` is
/// checked by the service so the caller gets a field-specific message.
#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "telefono")]
    pub phone: Option<String>,
    #[serde(rename = "direccion")]
    pub address: Option<String>,
    #[serde(rename = "empresa")]
    pub company: Option<String>,
    #[serde(rename = "nif")]
    pub tax_id: Option<String>,
    #[serde(rename = "rol")]
    pub role: Option<Role>,
    #[serde(rename = "estado")]
    pub status: Option<UserStatus>,
}

/// Omitted fields keep their stored value; `password` is re-hashed only when present.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "telefono")]
    pub phone: Option<String>,
    #[serde(rename = "direccion")]
    pub address: Option<String>,
    #[serde(rename = "empresa")]
    pub company: Option<String>,
    #[serde(rename = "nif")]
    pub tax_id: Option<String>,
    #[serde(rename = "rol")]
    pub role: Option<Role>,
    #[serde(rename = "estado")]
    pub status: Option<UserStatus>,
}

/// Public view of a user. Deliberately has no password field.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefono")]
    pub phone: Option<String>,
    #[serde(rename = "direccion")]
    pub address: Option<String>,
    #[serde(rename = "empresa")]
    pub company: Option<String>,
    #[serde(rename = "nif")]
    pub tax_id: Option<String>,
    #[serde(rename = "rol")]
    pub role: Role,
    #[serde(rename = "estado")]
    pub status: UserStatus,
    #[serde(rename = "fecha_registro")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "fecha_actualizacion")]
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            address: user.address,
            company: user.company,
            tax_id: user.tax_id,
            role: user.role,
            status: user.status,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub id: i64,
}
