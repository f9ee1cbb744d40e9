use serde::Deserialize;

/// Body of the quote and order status endpoints. The value is parsed by the
/// service so that an unknown status is a validation error, not a JSON one.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(alias = "estado")]
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "telefono")]
    pub phone: Option<String>,
    #[serde(rename = "direccion")]
    pub address: Option<String>,
    #[serde(rename = "empresa")]
    pub company: Option<String>,
    #[serde(rename = "nif")]
    pub tax_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(alias = "currentPassword", default)]
    pub current_password: String,
    #[serde(alias = "newPassword", default)]
    pub new_password: String,
}
