use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::dtos::admin::{
    CreateOrderRequest, CreatePaymentRequest, CreateProjectRequest, CreateQuoteRequest, UpdateProjectRequest,
};
use crate::error::AppError;
use crate::models::business::{
    NewOrder, NewPayment, NewProject, NewQuote, Order, Payment, PaymentStatus, Project, ProjectChanges,
    ProjectStatus, Quote,
};
use crate::models::user::Role;
use crate::repository::{BusinessRepository, UserRepository};
use crate::validation;

/// Back-office management of client-owned records.
#[derive(Clone)]
pub struct AdminService {
    users: Arc<dyn UserRepository>,
    business: Arc<dyn BusinessRepository>,
}

impl AdminService {
    pub fn new(users: Arc<dyn UserRepository>, business: Arc<dyn BusinessRepository>) -> Self {
        Self { users, business }
    }

    pub async fn projects(&self) -> Result<Vec<Project>, AppError> {
        self.business.all_projects().await
    }

    pub async fn create_project(&self, req: CreateProjectRequest) -> Result<Project, AppError> {
        self.ensure_client(req.user_id).await?;
        let name = validation::required(Some(req.name.as_str()), "El nombre del proyecto es obligatorio")?;
        let progress = req.progress.unwrap_or(0);
        check_progress(progress)?;
        if let Some(budget) = req.budget {
            validation::non_negative(budget, "El presupuesto no puede ser negativo")?;
        }
        check_dates(req.start_date, req.due_date)?;

        let project = self
            .business
            .insert_project(NewProject {
                user_id: req.user_id,
                name,
                description: validation::optional(req.description),
                status: req.status.unwrap_or(ProjectStatus::Pending),
                progress,
                start_date: req.start_date,
                due_date: req.due_date,
                budget: req.budget,
            })
            .await?;
        info!(project_id = project.id, user_id = project.user_id, "project created");
        Ok(project)
    }

    pub async fn update_project(&self, id: i64, req: UpdateProjectRequest) -> Result<Project, AppError> {
        let name = match req.name {
            Some(name) => Some(validation::required(
                Some(name.as_str()),
                "El nombre del proyecto no puede estar vacío",
            )?),
            None => None,
        };
        if let Some(progress) = req.progress {
            check_progress(progress)?;
        }
        if let Some(budget) = req.budget {
            validation::non_negative(budget, "El presupuesto no puede ser negativo")?;
        }
        check_dates(req.start_date, req.due_date)?;

        // Finishing a project implies full progress unless told otherwise.
        let progress = match (req.status, req.progress) {
            (Some(ProjectStatus::Completed), None) => Some(100),
            (_, progress) => progress,
        };

        self.business
            .update_project(
                id,
                ProjectChanges {
                    name,
                    description: validation::clearable(req.description),
                    status: req.status,
                    progress,
                    start_date: req.start_date,
                    due_date: req.due_date,
                    budget: req.budget,
                },
            )
            .await?
            .ok_or_else(|| AppError::not_found("Proyecto no encontrado"))
    }

    pub async fn delete_project(&self, id: i64) -> Result<(), AppError> {
        if self.business.delete_project(id).await? == 0 {
            return Err(AppError::not_found("Proyecto no encontrado"));
        }
        info!(project_id = id, "project deleted");
        Ok(())
    }

    pub async fn quotes(&self) -> Result<Vec<Quote>, AppError> {
        self.business.all_quotes().await
    }

    pub async fn create_quote(&self, req: CreateQuoteRequest) -> Result<Quote, AppError> {
        self.ensure_client(req.user_id).await?;
        let title = validation::required(Some(req.title.as_str()), "El título es obligatorio")?;
        validation::non_negative(req.amount, "El importe no puede ser negativo")?;

        let quote = self
            .business
            .insert_quote(NewQuote {
                user_id: req.user_id,
                title,
                description: validation::optional(req.description),
                amount: req.amount,
                valid_until: req.valid_until,
            })
            .await?;
        info!(quote_id = quote.id, user_id = quote.user_id, "quote created");
        Ok(quote)
    }

    pub async fn orders(&self) -> Result<Vec<Order>, AppError> {
        self.business.all_orders().await
    }

    pub async fn create_order(&self, req: CreateOrderRequest) -> Result<Order, AppError> {
        self.ensure_client(req.user_id).await?;
        let service = validation::required(Some(req.service.as_str()), "El servicio es obligatorio")?;
        validation::non_negative(req.amount, "El importe no puede ser negativo")?;

        let order = self
            .business
            .insert_order(NewOrder {
                user_id: req.user_id,
                service,
                description: validation::optional(req.description),
                amount: req.amount,
            })
            .await?;
        info!(order_id = order.id, user_id = order.user_id, "order created");
        Ok(order)
    }

    pub async fn payments(&self) -> Result<Vec<Payment>, AppError> {
        self.business.all_payments().await
    }

    pub async fn create_payment(&self, req: CreatePaymentRequest) -> Result<Payment, AppError> {
        self.ensure_client(req.user_id).await?;
        let concept = validation::required(Some(req.concept.as_str()), "El concepto es obligatorio")?;
        validation::non_negative(req.amount, "El importe no puede ser negativo")?;

        if let Some(project_id) = req.project_id {
            let owned = self
                .business
                .projects_for(req.user_id)
                .await?
                .iter()
                .any(|p| p.id == project_id);
            if !owned {
                return Err(AppError::validation("El proyecto no pertenece a ese cliente"));
            }
        }

        let payment = self
            .business
            .insert_payment(NewPayment {
                user_id: req.user_id,
                project_id: req.project_id,
                concept,
                amount: req.amount,
                status: req.status.unwrap_or(PaymentStatus::Pending),
                method: validation::optional(req.method),
            })
            .await?;
        info!(payment_id = payment.id, user_id = payment.user_id, "payment recorded");
        Ok(payment)
    }

    async fn ensure_client(&self, user_id: i64) -> Result<(), AppError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Cliente no encontrado"))?;
        if user.role != Role::Client {
            return Err(AppError::validation("El usuario indicado no es un cliente"));
        }
        Ok(())
    }
}

fn check_progress(progress: i32) -> Result<(), AppError> {
    if (0..=100).contains(&progress) {
        Ok(())
    } else {
        Err(AppError::validation("El progreso debe estar entre 0 y 100"))
    }
}

fn check_dates(start: Option<NaiveDate>, due: Option<NaiveDate>) -> Result<(), AppError> {
    match (start, due) {
        (Some(start), Some(due)) if due < start => Err(AppError::validation(
            "La fecha de entrega no puede ser anterior a la de inicio",
        )),
        _ => Ok(()),
    }
}
