use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::password::verify_password;
use crate::dtos::client::{ChangePasswordRequest, UpdateProfileRequest, UpdateStatusRequest};
use crate::dtos::user::UserResponse;
use crate::error::AppError;
use crate::models::business::{
    Activity, ClientStats, Order, OrderStatus, Payment, Project, Quote, QuoteStatus,
};
use crate::repository::BusinessRepository;
use crate::services::user_service::{ProfileFields, UserService};
use crate::validation;

const ACTIVITY_FEED_LEN: i64 = 20;

/// Client dashboard. Every method takes the caller's id and only ever reads or
/// mutates rows owned by it.
#[derive(Clone)]
pub struct ClientService {
    business: Arc<dyn BusinessRepository>,
    user_service: UserService,
}

impl ClientService {
    pub fn new(business: Arc<dyn BusinessRepository>, user_service: UserService) -> Self {
        Self { business, user_service }
    }

    pub async fn stats(&self, user_id: i64) -> Result<ClientStats, AppError> {
        self.business.stats_for(user_id).await
    }

    pub async fn projects(&self, user_id: i64) -> Result<Vec<Project>, AppError> {
        self.business.projects_for(user_id).await
    }

    pub async fn payments(&self, user_id: i64) -> Result<Vec<Payment>, AppError> {
        self.business.payments_for(user_id).await
    }

    pub async fn activity(&self, user_id: i64) -> Result<Vec<Activity>, AppError> {
        self.business.activity_for(user_id, ACTIVITY_FEED_LEN).await
    }

    pub async fn quotes(&self, user_id: i64) -> Result<Vec<Quote>, AppError> {
        self.business.quotes_for(user_id).await
    }

    pub async fn orders(&self, user_id: i64) -> Result<Vec<Order>, AppError> {
        self.business.orders_for(user_id).await
    }

    /// Accept or reject one of the caller's pending quotes.
    pub async fn update_quote_status(
        &self,
        user_id: i64,
        quote_id: i64,
        req: UpdateStatusRequest,
    ) -> Result<Quote, AppError> {
        let target = req
            .status
            .trim()
            .parse::<QuoteStatus>()
            .ok()
            .filter(|s| s.is_client_decision())
            .ok_or_else(|| AppError::validation("Estado no válido. Valores permitidos: accepted, rejected"))?;

        let quote = self
            .business
            .find_quote(quote_id)
            .await?
            .ok_or_else(|| AppError::not_found("Presupuesto no encontrado"))?;

        if quote.user_id != user_id {
            warn!(user_id, quote_id, "quote belongs to another client");
            return Err(AppError::forbidden("No tienes permiso sobre este presupuesto"));
        }

        if quote.status != QuoteStatus::Pending {
            return Err(AppError::conflict("El presupuesto ya ha sido respondido"));
        }

        let updated = self
            .business
            .transition_quote(quote_id, QuoteStatus::Pending, target)
            .await?
            .ok_or_else(|| AppError::conflict("El presupuesto ya ha sido respondido"))?;

        let (action, verb) = match target {
            QuoteStatus::Accepted => ("quote_accepted", "aceptado"),
            _ => ("quote_rejected", "rechazado"),
        };
        self.log(user_id, action, format!("Presupuesto \"{}\" {verb}", updated.title)).await;

        info!(user_id, quote_id, status = %target, "quote answered");
        Ok(updated)
    }

    /// Cancel, pause or reactivate one of the caller's orders.
    pub async fn update_order_status(
        &self,
        user_id: i64,
        order_id: i64,
        req: UpdateStatusRequest,
    ) -> Result<Order, AppError> {
        let target = req
            .status
            .trim()
            .parse::<OrderStatus>()
            .ok()
            .filter(|s| matches!(s, OrderStatus::Active | OrderStatus::Paused | OrderStatus::Cancelled))
            .ok_or_else(|| {
                AppError::validation("Estado no válido. Valores permitidos: active, paused, cancelled")
            })?;

        let order = self
            .business
            .find_order(order_id)
            .await?
            .ok_or_else(|| AppError::not_found("Pedido no encontrado"))?;

        if order.user_id != user_id {
            warn!(user_id, order_id, "order belongs to another client");
            return Err(AppError::forbidden("No tienes permiso sobre este pedido"));
        }

        if !order.status.client_can_move_to(target) {
            return Err(AppError::conflict(format!(
                "No se puede pasar un pedido de '{}' a '{}'",
                order.status, target
            )));
        }

        let updated = self
            .business
            .transition_order(order_id, order.status, target)
            .await?
            .ok_or_else(|| AppError::conflict("El pedido ha cambiado, vuelve a intentarlo"))?;

        let (action, verb) = match target {
            OrderStatus::Cancelled => ("order_cancelled", "cancelado"),
            OrderStatus::Paused => ("order_paused", "pausado"),
            _ => ("order_reactivated", "reactivado"),
        };
        self.log(user_id, action, format!("Pedido \"{}\" {verb}", updated.service)).await;

        info!(user_id, order_id, from = %order.status, to = %target, "order status changed");
        Ok(updated)
    }

    pub async fn profile(&self, user_id: i64) -> Result<UserResponse, AppError> {
        self.user_service.get_user(user_id).await
    }

    /// Contact details only; role and status are not client-editable.
    pub async fn update_profile(&self, user_id: i64, req: UpdateProfileRequest) -> Result<UserResponse, AppError> {
        let fields = ProfileFields {
            name: req.name,
            email: req.email,
            phone: req.phone,
            address: req.address,
            company: req.company,
            tax_id: req.tax_id,
        };
        let changes = self.user_service.profile_changes(user_id, fields).await?;
        let user = self.user_service.apply_changes(user_id, changes).await?;

        self.log(user_id, "profile_updated", "Perfil actualizado".to_string()).await;
        Ok(UserResponse::from(user))
    }

    pub async fn change_password(&self, user_id: i64, req: ChangePasswordRequest) -> Result<(), AppError> {
        if req.current_password.is_empty() || req.new_password.is_empty() {
            return Err(AppError::validation("La contraseña actual y la nueva son obligatorias"));
        }
        validation::password(&req.new_password)?;

        let user = self.user_service.find(user_id).await?;
        if !verify_password(&req.current_password, &user.password_hash).await? {
            return Err(AppError::validation("La contraseña actual no es correcta"));
        }

        self.user_service.set_password(user_id, &req.new_password).await?;
        self.log(user_id, "password_changed", "Contraseña cambiada".to_string()).await;

        info!(user_id, "password changed");
        Ok(())
    }

    /// The mutation has already been committed, so a failed activity insert is
    /// only logged.
    async fn log(&self, user_id: i64, action: &str, description: String) {
        if let Err(e) = self.business.record_activity(user_id, action, &description).await {
            warn!(user_id, action, error = %e, "failed to record activity");
        }
    }
}
