pub mod jwt;
pub mod password;

use uuid::Uuid;

use crate::models::user::Role;

/// Identity resolved from the session for the current request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: i64,
    pub session_id: Uuid,
    pub role: Role,
}
