use std::sync::Arc;

use tracing::info;

use crate::dtos::contact::ContactRequest;
use crate::error::AppError;
use crate::models::contact::{ContactMessage, NewContactMessage};
use crate::repository::ContactRepository;
use crate::validation;

const MAX_MESSAGE_CHARS: usize = 5000;

#[derive(Clone)]
pub struct ContactService {
    messages: Arc<dyn ContactRepository>,
}

impl ContactService {
    pub fn new(messages: Arc<dyn ContactRepository>) -> Self {
        Self { messages }
    }

    pub async fn submit(&self, req: ContactRequest) -> Result<ContactMessage, AppError> {
        let name = validation::required(req.name.as_deref(), "El nombre es obligatorio")?;
        let email = validation::required(req.email.as_deref(), "El email es obligatorio")?;
        let email = validation::email(&email)?;
        let message = validation::required(req.message.as_deref(), "El mensaje es obligatorio")?;
        if message.chars().count() > MAX_MESSAGE_CHARS {
            return Err(AppError::validation(format!(
                "El mensaje no puede superar {MAX_MESSAGE_CHARS} caracteres"
            )));
        }

        let saved = self
            .messages
            .insert(NewContactMessage {
                name,
                email,
                phone: validation::optional(req.phone),
                subject: validation::optional(req.subject),
                message,
            })
            .await?;

        info!(message_id = saved.id, "contact message received");
        Ok(saved)
    }

    pub async fn list(&self) -> Result<Vec<ContactMessage>, AppError> {
        self.messages.list().await
    }
}
