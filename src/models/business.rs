//! Client-owned records: projects, payments, quotes, orders and the activity feed.
//! Every row carries exactly one `user_id`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::text_enum;

text_enum! {
    ProjectStatus {
        Pending => "pending",
        InProgress => "in_progress",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

text_enum! {
    PaymentStatus {
        Pending => "pending",
        Paid => "paid",
        Failed => "failed",
    }
}

text_enum! {
    QuoteStatus {
        Pending => "pending",
        Accepted => "accepted",
        Rejected => "rejected",
    }
}

text_enum! {
    OrderStatus {
        Active => "active",
        Paused => "paused",
        Cancelled => "cancelled",
        Completed => "completed",
    }
}

impl QuoteStatus {
    /// Decisions a client may take on a pending quote.
    pub fn is_client_decision(self) -> bool {
        matches!(self, QuoteStatus::Accepted | QuoteStatus::Rejected)
    }
}

impl OrderStatus {
    /// Transitions a client may trigger on their own order.
    pub fn client_can_move_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Active, OrderStatus::Paused)
                | (OrderStatus::Active, OrderStatus::Cancelled)
                | (OrderStatus::Paused, OrderStatus::Active)
                | (OrderStatus::Paused, OrderStatus::Cancelled)
        )
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ProjectStatus,
    pub progress: i32,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub budget: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Payment {
    pub id: i64,
    pub user_id: i64,
    pub project_id: Option<i64>,
    pub concept: String,
    pub amount: f64,
    #[sqlx(try_from = "String")]
    pub status: PaymentStatus,
    pub method: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Quote {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub amount: f64,
    #[sqlx(try_from = "String")]
    pub status: QuoteStatus,
    pub valid_until: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub service: String,
    pub description: Option<String>,
    pub amount: f64,
    #[sqlx(try_from = "String")]
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Activity {
    pub id: i64,
    pub user_id: i64,
    pub action: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize)]
pub struct ClientStats {
    pub total_projects: i64,
    pub active_projects: i64,
    pub completed_projects: i64,
    pub total_paid: f64,
    pub pending_amount: f64,
    pub pending_quotes: i64,
    pub active_orders: i64,
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub progress: i32,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub budget: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectChanges {
    pub name: Option<String>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
    pub status: Option<ProjectStatus>,
    pub progress: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub budget: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub user_id: i64,
    pub project_id: Option<i64>,
    pub concept: String,
    pub amount: f64,
    pub status: PaymentStatus,
    pub method: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewQuote {
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub amount: f64,
    pub valid_until: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: i64,
    pub service: String,
    pub description: Option<String>,
    pub amount: f64,
}
