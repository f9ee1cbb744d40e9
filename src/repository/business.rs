use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::business::{
    Activity, ClientStats, NewOrder, NewPayment, NewProject, NewQuote, Order, OrderStatus, Payment,
    Project, ProjectChanges, Quote, QuoteStatus,
};

const PROJECT_COLUMNS: &str =
    "id, user_id, name, description, status, progress, start_date, due_date, budget, created_at, updated_at";
const PAYMENT_COLUMNS: &str = "id, user_id, project_id, concept, amount, status, method, paid_at, created_at";
const QUOTE_COLUMNS: &str =
    "id, user_id, title, description, amount, status, valid_until, created_at, updated_at";
const ORDER_COLUMNS: &str = "id, user_id, service, description, amount, status, created_at, updated_at";

/// Projects, payments, quotes, orders and the activity log.
///
/// The `*_for` methods are scoped to one owner; the `all_*`/`insert_*` methods
/// back the admin panel.
#[async_trait]
pub trait BusinessRepository: Send + Sync {
    async fn stats_for(&self, user_id: i64) -> Result<ClientStats, AppError>;
    async fn projects_for(&self, user_id: i64) -> Result<Vec<Project>, AppError>;
    async fn payments_for(&self, user_id: i64) -> Result<Vec<Payment>, AppError>;
    async fn quotes_for(&self, user_id: i64) -> Result<Vec<Quote>, AppError>;
    async fn orders_for(&self, user_id: i64) -> Result<Vec<Order>, AppError>;
    async fn activity_for(&self, user_id: i64, limit: i64) -> Result<Vec<Activity>, AppError>;

    async fn find_quote(&self, id: i64) -> Result<Option<Quote>, AppError>;
    async fn find_order(&self, id: i64) -> Result<Option<Order>, AppError>;

    /// Compare-and-set on status: `None` when the row is no longer in `from`.
    async fn transition_quote(
        &self,
        id: i64,
        from: QuoteStatus,
        to: QuoteStatus,
    ) -> Result<Option<Quote>, AppError>;

    /// Compare-and-set on status: `None` when the row is no longer in `from`.
    async fn transition_order(
        &self,
        id: i64,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<Option<Order>, AppError>;

    async fn record_activity(&self, user_id: i64, action: &str, description: &str) -> Result<(), AppError>;

    async fn all_projects(&self) -> Result<Vec<Project>, AppError>;
    async fn insert_project(&self, project: NewProject) -> Result<Project, AppError>;
    async fn update_project(&self, id: i64, changes: ProjectChanges) -> Result<Option<Project>, AppError>;
    async fn delete_project(&self, id: i64) -> Result<u64, AppError>;

    async fn all_quotes(&self) -> Result<Vec<Quote>, AppError>;
    async fn insert_quote(&self, quote: NewQuote) -> Result<Quote, AppError>;

    async fn all_orders(&self) -> Result<Vec<Order>, AppError>;
    async fn insert_order(&self, order: NewOrder) -> Result<Order, AppError>;

    async fn all_payments(&self) -> Result<Vec<Payment>, AppError>;
    async fn insert_payment(&self, payment: NewPayment) -> Result<Payment, AppError>;
}

#[derive(Clone)]
pub struct PgBusinessRepository {
    pool: PgPool,
}

impl PgBusinessRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BusinessRepository for PgBusinessRepository {
    async fn stats_for(&self, user_id: i64) -> Result<ClientStats, AppError> {
        let stats = sqlx::query_as::<_, ClientStats>(
            "SELECT
                (SELECT COUNT(*) FROM projects WHERE user_id = $1) AS total_projects,
                (SELECT COUNT(*) FROM projects WHERE user_id = $1 AND status = 'in_progress') AS active_projects,
                (SELECT COUNT(*) FROM projects WHERE user_id = $1 AND status = 'completed') AS completed_projects,
                (SELECT COALESCE(SUM(amount), 0)::FLOAT8 FROM payments WHERE user_id = $1 AND status = 'paid') AS total_paid,
                (SELECT COALESCE(SUM(amount), 0)::FLOAT8 FROM payments WHERE user_id = $1 AND status = 'pending') AS pending_amount,
                (SELECT COUNT(*) FROM quotes WHERE user_id = $1 AND status = 'pending') AS pending_quotes,
                (SELECT COUNT(*) FROM orders WHERE user_id = $1 AND status = 'active') AS active_orders",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }

    async fn projects_for(&self, user_id: i64) -> Result<Vec<Project>, AppError> {
        let rows = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn payments_for(&self, user_id: i64) -> Result<Vec<Payment>, AppError> {
        let rows = sqlx::query_as::<_, Payment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn quotes_for(&self, user_id: i64) -> Result<Vec<Quote>, AppError> {
        let rows = sqlx::query_as::<_, Quote>(&format!(
            "SELECT {QUOTE_COLUMNS} FROM quotes WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn orders_for(&self, user_id: i64) -> Result<Vec<Order>, AppError> {
        let rows = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn activity_for(&self, user_id: i64, limit: i64) -> Result<Vec<Activity>, AppError> {
        let rows = sqlx::query_as::<_, Activity>(
            "SELECT id, user_id, action, description, created_at
             FROM activity_log WHERE user_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_quote(&self, id: i64) -> Result<Option<Quote>, AppError> {
        let row = sqlx::query_as::<_, Quote>(&format!("SELECT {QUOTE_COLUMNS} FROM quotes WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_order(&self, id: i64) -> Result<Option<Order>, AppError> {
        let row = sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn transition_quote(
        &self,
        id: i64,
        from: QuoteStatus,
        to: QuoteStatus,
    ) -> Result<Option<Quote>, AppError> {
        let row = sqlx::query_as::<_, Quote>(&format!(
            "UPDATE quotes SET status = $3, updated_at = NOW()
             WHERE id = $1 AND status = $2
             RETURNING {QUOTE_COLUMNS}"
        ))
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn transition_order(
        &self,
        id: i64,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<Option<Order>, AppError> {
        let row = sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders SET status = $3, updated_at = NOW()
             WHERE id = $1 AND status = $2
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn record_activity(&self, user_id: i64, action: &str, description: &str) -> Result<(), AppError> {
        sqlx::query("INSERT INTO activity_log (user_id, action, description) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(action)
            .bind(description)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn all_projects(&self) -> Result<Vec<Project>, AppError> {
        let rows = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert_project(&self, project: NewProject) -> Result<Project, AppError> {
        let row = sqlx::query_as::<_, Project>(&format!(
            "INSERT INTO projects (user_id, name, description, status, progress, start_date, due_date, budget)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(project.user_id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.status.as_str())
        .bind(project.progress)
        .bind(project.start_date)
        .bind(project.due_date)
        .bind(project.budget)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_project(&self, id: i64, changes: ProjectChanges) -> Result<Option<Project>, AppError> {
        let row = sqlx::query_as::<_, Project>(&format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                status = COALESCE($5, status),
                progress = COALESCE($6, progress),
                start_date = COALESCE($7, start_date),
                due_date = COALESCE($8, due_date),
                budget = COALESCE($9, budget),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.description.is_some())
        .bind(changes.description.flatten())
        .bind(changes.status.map(|s| s.as_str()))
        .bind(changes.progress)
        .bind(changes.start_date)
        .bind(changes.due_date)
        .bind(changes.budget)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_project(&self, id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn all_quotes(&self) -> Result<Vec<Quote>, AppError> {
        let rows = sqlx::query_as::<_, Quote>(&format!(
            "SELECT {QUOTE_COLUMNS} FROM quotes ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert_quote(&self, quote: NewQuote) -> Result<Quote, AppError> {
        let row = sqlx::query_as::<_, Quote>(&format!(
            "INSERT INTO quotes (user_id, title, description, amount, valid_until)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {QUOTE_COLUMNS}"
        ))
        .bind(quote.user_id)
        .bind(&quote.title)
        .bind(&quote.description)
        .bind(quote.amount)
        .bind(quote.valid_until)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn all_orders(&self) -> Result<Vec<Order>, AppError> {
        let rows = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert_order(&self, order: NewOrder) -> Result<Order, AppError> {
        let row = sqlx::query_as::<_, Order>(&format!(
            "INSERT INTO orders (user_id, service, description, amount)
             VALUES ($1, $2, $3, $4)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(order.user_id)
        .bind(&order.service)
        .bind(&order.description)
        .bind(order.amount)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn all_payments(&self) -> Result<Vec<Payment>, AppError> {
        let rows = sqlx::query_as::<_, Payment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert_payment(&self, payment: NewPayment) -> Result<Payment, AppError> {
        let row = sqlx::query_as::<_, Payment>(&format!(
            "INSERT INTO payments (user_id, project_id, concept, amount, status, method, paid_at)
             VALUES ($1, $2, $3, $4, $5, $6, CASE WHEN $5 = 'paid' THEN NOW() END)
             RETURNING {PAYMENT_COLUMNS}"
        ))
        .bind(payment.user_id)
        .bind(payment.project_id)
        .bind(&payment.concept)
        .bind(payment.amount)
        .bind(payment.status.as_str())
        .bind(&payment.method)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
