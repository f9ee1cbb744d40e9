use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::business::{PaymentStatus, ProjectStatus};

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub progress: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub budget: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub progress: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub budget: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateQuoteRequest {
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub amount: f64,
    pub valid_until: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub user_id: i64,
    pub service: String,
    pub description: Option<String>,
    pub amount: f64,
}

#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    pub user_id: i64,
    pub project_id: Option<i64>,
    pub concept: String,
    pub amount: f64,
    pub status: Option<PaymentStatus>,
    pub method: Option<String>,
}
