//! In-memory repositories and a wired-up [`AppState`] for tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::dtos::user::{CreateUserRequest, UserResponse};
use crate::error::AppError;
use crate::models::business::{
    Activity, ClientStats, NewOrder, NewPayment, NewProject, NewQuote, Order, OrderStatus, Payment,
    PaymentStatus, Project, ProjectChanges, ProjectStatus, Quote, QuoteStatus,
};
use crate::models::contact::{ContactMessage, NewContactMessage};
use crate::models::session::Session;
use crate::models::user::{NewUser, Role, User, UserChanges};
use crate::repository::users::EMAIL_TAKEN;
use crate::repository::{BusinessRepository, ContactRepository, SessionRepository, UserRepository};
use crate::state::{AppState, Repositories, SecuritySettings};

pub const TEST_BCRYPT_COST: u32 = 4;
pub const TEST_SECRET: &str = "test-secret-with-enough-length";

fn newest_first<T>(mut rows: Vec<T>, id: impl Fn(&T) -> i64) -> Vec<T> {
    rows.sort_by_key(|r| std::cmp::Reverse(id(r)));
    rows
}

#[derive(Default)]
pub struct MemoryUserRepository {
    rows: Mutex<Vec<User>>,
}

impl MemoryUserRepository {
    pub fn get(&self, id: i64) -> Option<User> {
        self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }

    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn list(&self) -> Result<Vec<User>, AppError> {
        Ok(newest_first(self.rows.lock().unwrap().clone(), |u| u.id))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.get(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|u| u.email.eq_ignore_ascii_case(email)).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(AppError::conflict(EMAIL_TAKEN));
        }
        let now = Utc::now();
        let stored = User {
            id: rows.iter().map(|u| u.id).max().unwrap_or(0) + 1,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            phone: user.phone,
            address: user.address,
            company: user.company,
            tax_id: user.tax_id,
            role: user.role,
            status: user.status,
            created_at: now,
            updated_at: now,
        };
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: i64, changes: UserChanges) -> Result<Option<User>, AppError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(email) = &changes.email {
            if rows.iter().any(|u| u.id != id && u.email.eq_ignore_ascii_case(email)) {
                return Err(AppError::conflict(EMAIL_TAKEN));
            }
        }
        let Some(user) = rows.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(v) = changes.name {
            user.name = v;
        }
        if let Some(v) = changes.email {
            user.email = v;
        }
        if let Some(v) = changes.phone {
            user.phone = v;
        }
        if let Some(v) = changes.address {
            user.address = v;
        }
        if let Some(v) = changes.company {
            user.company = v;
        }
        if let Some(v) = changes.tax_id {
            user.tax_id = v;
        }
        if let Some(v) = changes.role {
            user.role = v;
        }
        if let Some(v) = changes.status {
            user.status = v;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i64) -> Result<u64, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|u| u.id != id);
        Ok((before - rows.len()) as u64)
    }
}

#[derive(Default)]
pub struct MemorySessionRepository {
    rows: Mutex<Vec<Session>>,
}

impl MemorySessionRepository {
    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn insert(&self, session: &Session) -> Result<(), AppError> {
        self.rows.lock().unwrap().push(session.clone());
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Session>, AppError> {
        Ok(self.rows.lock().unwrap().iter().find(|s| s.id == id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.rows.lock().unwrap().retain(|s| s.id != id);
        Ok(())
    }

    async fn delete_expired_for_user(&self, user_id: i64, now: DateTime<Utc>) -> Result<u64, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|s| !(s.user_id == user_id && s.is_expired(now)));
        Ok((before - rows.len()) as u64)
    }
}

#[derive(Default)]
struct BusinessTables {
    next_id: i64,
    projects: Vec<Project>,
    payments: Vec<Payment>,
    quotes: Vec<Quote>,
    orders: Vec<Order>,
    activity: Vec<Activity>,
}

impl BusinessTables {
    fn id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryBusinessRepository {
    tables: Mutex<BusinessTables>,
}

#[async_trait]
impl BusinessRepository for MemoryBusinessRepository {
    async fn stats_for(&self, user_id: i64) -> Result<ClientStats, AppError> {
        let t = self.tables.lock().unwrap();
        let projects: Vec<&Project> = t.projects.iter().filter(|p| p.user_id == user_id).collect();
        let payments: Vec<&Payment> = t.payments.iter().filter(|p| p.user_id == user_id).collect();
        let count_projects = |status: ProjectStatus| projects.iter().filter(|p| p.status == status).count() as i64;
        let sum_payments =
            |status: PaymentStatus| payments.iter().filter(|p| p.status == status).map(|p| p.amount).sum::<f64>();

        Ok(ClientStats {
            total_projects: projects.len() as i64,
            active_projects: count_projects(ProjectStatus::InProgress),
            completed_projects: count_projects(ProjectStatus::Completed),
            total_paid: sum_payments(PaymentStatus::Paid),
            pending_amount: sum_payments(PaymentStatus::Pending),
            pending_quotes: t
                .quotes
                .iter()
                .filter(|q| q.user_id == user_id && q.status == QuoteStatus::Pending)
                .count() as i64,
            active_orders: t
                .orders
                .iter()
                .filter(|o| o.user_id == user_id && o.status == OrderStatus::Active)
                .count() as i64,
        })
    }

    async fn projects_for(&self, user_id: i64) -> Result<Vec<Project>, AppError> {
        let t = self.tables.lock().unwrap();
        let rows = t.projects.iter().filter(|r| r.user_id == user_id).cloned().collect();
        Ok(newest_first(rows, |r| r.id))
    }

    async fn payments_for(&self, user_id: i64) -> Result<Vec<Payment>, AppError> {
        let t = self.tables.lock().unwrap();
        let rows = t.payments.iter().filter(|r| r.user_id == user_id).cloned().collect();
        Ok(newest_first(rows, |r| r.id))
    }

    async fn quotes_for(&self, user_id: i64) -> Result<Vec<Quote>, AppError> {
        let t = self.tables.lock().unwrap();
        let rows = t.quotes.iter().filter(|r| r.user_id == user_id).cloned().collect();
        Ok(newest_first(rows, |r| r.id))
    }

    async fn orders_for(&self, user_id: i64) -> Result<Vec<Order>, AppError> {
        let t = self.tables.lock().unwrap();
        let rows = t.orders.iter().filter(|r| r.user_id == user_id).cloned().collect();
        Ok(newest_first(rows, |r| r.id))
    }

    async fn activity_for(&self, user_id: i64, limit: i64) -> Result<Vec<Activity>, AppError> {
        let t = self.tables.lock().unwrap();
        let rows = t.activity.iter().filter(|r| r.user_id == user_id).cloned().collect();
        let mut rows = newest_first(rows, |r| r.id);
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn find_quote(&self, id: i64) -> Result<Option<Quote>, AppError> {
        Ok(self.tables.lock().unwrap().quotes.iter().find(|q| q.id == id).cloned())
    }

    async fn find_order(&self, id: i64) -> Result<Option<Order>, AppError> {
        Ok(self.tables.lock().unwrap().orders.iter().find(|o| o.id == id).cloned())
    }

    async fn transition_quote(
        &self,
        id: i64,
        from: QuoteStatus,
        to: QuoteStatus,
    ) -> Result<Option<Quote>, AppError> {
        let mut t = self.tables.lock().unwrap();
        Ok(t.quotes.iter_mut().find(|q| q.id == id && q.status == from).map(|q| {
            q.status = to;
            q.updated_at = Utc::now();
            q.clone()
        }))
    }

    async fn transition_order(
        &self,
        id: i64,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<Option<Order>, AppError> {
        let mut t = self.tables.lock().unwrap();
        Ok(t.orders.iter_mut().find(|o| o.id == id && o.status == from).map(|o| {
            o.status = to;
            o.updated_at = Utc::now();
            o.clone()
        }))
    }

    async fn record_activity(&self, user_id: i64, action: &str, description: &str) -> Result<(), AppError> {
        let mut t = self.tables.lock().unwrap();
        let id = t.id();
        t.activity.push(Activity {
            id,
            user_id,
            action: action.to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn all_projects(&self) -> Result<Vec<Project>, AppError> {
        Ok(newest_first(self.tables.lock().unwrap().projects.clone(), |r| r.id))
    }

    async fn insert_project(&self, project: NewProject) -> Result<Project, AppError> {
        let mut t = self.tables.lock().unwrap();
        let now = Utc::now();
        let row = Project {
            id: t.id(),
            user_id: project.user_id,
            name: project.name,
            description: project.description,
            status: project.status,
            progress: project.progress,
            start_date: project.start_date,
            due_date: project.due_date,
            budget: project.budget,
            created_at: now,
            updated_at: now,
        };
        t.projects.push(row.clone());
        Ok(row)
    }

    async fn update_project(&self, id: i64, changes: ProjectChanges) -> Result<Option<Project>, AppError> {
        let mut t = self.tables.lock().unwrap();
        let Some(p) = t.projects.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(v) = changes.name {
            p.name = v;
        }
        if let Some(v) = changes.description {
            p.description = v;
        }
        if let Some(v) = changes.status {
            p.status = v;
        }
        if let Some(v) = changes.progress {
            p.progress = v;
        }
        if let Some(v) = changes.start_date {
            p.start_date = Some(v);
        }
        if let Some(v) = changes.due_date {
            p.due_date = Some(v);
        }
        if let Some(v) = changes.budget {
            p.budget = Some(v);
        }
        p.updated_at = Utc::now();
        Ok(Some(p.clone()))
    }

    async fn delete_project(&self, id: i64) -> Result<u64, AppError> {
        let mut t = self.tables.lock().unwrap();
        let before = t.projects.len();
        t.projects.retain(|p| p.id != id);
        Ok((before - t.projects.len()) as u64)
    }

    async fn all_quotes(&self) -> Result<Vec<Quote>, AppError> {
        Ok(newest_first(self.tables.lock().unwrap().quotes.clone(), |r| r.id))
    }

    async fn insert_quote(&self, quote: NewQuote) -> Result<Quote, AppError> {
        let mut t = self.tables.lock().unwrap();
        let now = Utc::now();
        let row = Quote {
            id: t.id(),
            user_id: quote.user_id,
            title: quote.title,
            description: quote.description,
            amount: quote.amount,
            status: QuoteStatus::Pending,
            valid_until: quote.valid_until,
            created_at: now,
            updated_at: now,
        };
        t.quotes.push(row.clone());
        Ok(row)
    }

    async fn all_orders(&self) -> Result<Vec<Order>, AppError> {
        Ok(newest_first(self.tables.lock().unwrap().orders.clone(), |r| r.id))
    }

    async fn insert_order(&self, order: NewOrder) -> Result<Order, AppError> {
        let mut t = self.tables.lock().unwrap();
        let now = Utc::now();
        let row = Order {
            id: t.id(),
            user_id: order.user_id,
            service: order.service,
            description: order.description,
            amount: order.amount,
            status: OrderStatus::Active,
            created_at: now,
            updated_at: now,
        };
        t.orders.push(row.clone());
        Ok(row)
    }

    async fn all_payments(&self) -> Result<Vec<Payment>, AppError> {
        Ok(newest_first(self.tables.lock().unwrap().payments.clone(), |r| r.id))
    }

    async fn insert_payment(&self, payment: NewPayment) -> Result<Payment, AppError> {
        let mut t = self.tables.lock().unwrap();
        let now = Utc::now();
        let row = Payment {
            id: t.id(),
            user_id: payment.user_id,
            project_id: payment.project_id,
            concept: payment.concept,
            amount: payment.amount,
            status: payment.status,
            method: payment.method,
            paid_at: (payment.status == PaymentStatus::Paid).then_some(now),
            created_at: now,
        };
        t.payments.push(row.clone());
        Ok(row)
    }
}

#[derive(Default)]
pub struct MemoryContactRepository {
    rows: Mutex<Vec<ContactMessage>>,
}

#[async_trait]
impl ContactRepository for MemoryContactRepository {
    async fn insert(&self, message: NewContactMessage) -> Result<ContactMessage, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let row = ContactMessage {
            id: rows.len() as i64 + 1,
            name: message.name,
            email: message.email,
            phone: message.phone,
            subject: message.subject,
            message: message.message,
            created_at: Utc::now(),
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn list(&self) -> Result<Vec<ContactMessage>, AppError> {
        Ok(newest_first(self.rows.lock().unwrap().clone(), |r| r.id))
    }
}

/// Application state over in-memory storage, with handles to inspect it.
pub struct TestContext {
    pub state: AppState,
    pub users: Arc<MemoryUserRepository>,
    pub sessions: Arc<MemorySessionRepository>,
    pub business: Arc<MemoryBusinessRepository>,
    pub contact: Arc<MemoryContactRepository>,
}

impl TestContext {
    pub fn new() -> Self {
        let users = Arc::new(MemoryUserRepository::default());
        let sessions = Arc::new(MemorySessionRepository::default());
        let business = Arc::new(MemoryBusinessRepository::default());
        let contact = Arc::new(MemoryContactRepository::default());

        let state = AppState::from_repositories(
            Repositories {
                users: users.clone(),
                sessions: sessions.clone(),
                business: business.clone(),
                contact: contact.clone(),
            },
            SecuritySettings {
                session_secret: TEST_SECRET.to_string(),
                session_ttl: Duration::hours(8),
                bcrypt_cost: TEST_BCRYPT_COST,
                cookie_secure: false,
            },
        );

        Self {
            state,
            users,
            sessions,
            business,
            contact,
        }
    }

    pub async fn seed_user(&self, email: &str, password: &str, role: Role) -> UserResponse {
        self.state
            .users
            .create_user(CreateUserRequest {
                name: Some(email.split('@').next().unwrap_or(email).to_string()),
                email: Some(email.to_string()),
                password: Some(password.to_string()),
                role: Some(role),
                ..Default::default()
            })
            .await
            .unwrap()
    }
}
