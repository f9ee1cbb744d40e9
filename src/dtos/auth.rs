use serde::{Deserialize, Serialize};

use crate::dtos::user::UserResponse;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Public sign-up; always creates a `client`.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
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
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: UserResponse,
    pub token: String,
    pub token_type: &'static str,
    pub expires_in_seconds: i64,
}
