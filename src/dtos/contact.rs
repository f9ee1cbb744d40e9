use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct ContactRequest {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "telefono")]
    pub phone: Option<String>,
    #[serde(rename = "asunto")]
    pub subject: Option<String>,
    #[serde(rename = "mensaje")]
    pub message: Option<String>,
}
