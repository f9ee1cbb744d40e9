use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::OnceCell;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::jwt::{sign_token, verify_token};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::AuthContext;
use crate::dtos::auth::{LoginRequest, RegisterRequest, SessionResponse};
use crate::dtos::user::{CreateUserRequest, UserResponse};
use crate::error::AppError;
use crate::models::session::Session;
use crate::models::user::{Role, User};
use crate::repository::{SessionRepository, UserRepository};
use crate::services::UserService;

const INVALID_CREDENTIALS: &str = "Credenciales incorrectas";
const SESSION_INVALID: &str = "Sesión no válida o expirada";

/// Login, logout and per-request session resolution.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    user_service: UserService,
    secret: Arc<str>,
    ttl: Duration,
    // Checked against when the email is unknown so both paths cost one bcrypt verify.
    dummy_hash: Arc<OnceCell<String>>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        user_service: UserService,
        secret: &str,
        ttl: Duration,
    ) -> Self {
        Self {
            users,
            sessions,
            user_service,
            secret: Arc::from(secret),
            ttl,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    pub fn session_ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn login(&self, req: LoginRequest) -> Result<SessionResponse, AppError> {
        let email = req.email.trim().to_lowercase();
        if email.is_empty() || req.password.is_empty() {
            return Err(AppError::validation("Email y contraseña son obligatorios"));
        }

        // Unknown email and wrong password share one message and one bcrypt cost.
        let Some(user) = self.users.find_by_email(&email).await? else {
            verify_password(&req.password, self.dummy_hash().await?).await?;
            return Err(AppError::unauthenticated(INVALID_CREDENTIALS));
        };

        if !verify_password(&req.password, &user.password_hash).await? {
            warn!(user_id = user.id, "failed login attempt");
            return Err(AppError::unauthenticated(INVALID_CREDENTIALS));
        }

        if !user.is_active() {
            return Err(AppError::forbidden("La cuenta está desactivada"));
        }

        self.open_session(user).await
    }

    /// Public sign-up. The account is always a client.
    pub async fn register(&self, req: RegisterRequest) -> Result<SessionResponse, AppError> {
        let created = self
            .user_service
            .create_user(CreateUserRequest {
                name: req.name,
                email: req.email,
                password: req.password,
                phone: req.phone,
                address: req.address,
                company: req.company,
                tax_id: req.tax_id,
                role: Some(Role::Client),
                status: None,
            })
            .await?;
        let user = self.user_service.find(created.id).await?;
        self.open_session(user).await
    }

    pub async fn logout(&self, ctx: &AuthContext) -> Result<(), AppError> {
        self.sessions.delete(ctx.session_id).await?;
        info!(user_id = ctx.user_id, "session closed");
        Ok(())
    }

    /// Resolves a token to the identity behind it. The token must verify, the
    /// session must still exist and be unexpired, and the user must be active.
    pub async fn authenticate(&self, token: &str) -> Result<AuthContext, AppError> {
        let claims = verify_token(token, &self.secret)?;

        let session = self
            .sessions
            .find(claims.sid)
            .await?
            .ok_or_else(|| AppError::unauthenticated(SESSION_INVALID))?;

        if session.user_id != claims.sub {
            return Err(AppError::unauthenticated(SESSION_INVALID));
        }

        if session.is_expired(Utc::now()) {
            self.sessions.delete(session.id).await?;
            return Err(AppError::unauthenticated(SESSION_INVALID));
        }

        let user = self
            .users
            .find_by_id(session.user_id)
            .await?
            .ok_or_else(|| AppError::unauthenticated(SESSION_INVALID))?;

        if !user.is_active() {
            return Err(AppError::unauthenticated(SESSION_INVALID));
        }

        Ok(AuthContext {
            user_id: user.id,
            session_id: session.id,
            role: user.role,
        })
    }

    async fn dummy_hash(&self) -> Result<&str, AppError> {
        let cost = self.user_service.bcrypt_cost();
        let hash = self
            .dummy_hash
            .get_or_try_init(|| hash_password("not-a-real-password", cost))
            .await?;
        Ok(hash.as_str())
    }

    async fn open_session(&self, user: User) -> Result<SessionResponse, AppError> {
        let now = Utc::now();
        let purged = self.sessions.delete_expired_for_user(user.id, now).await?;
        if purged > 0 {
            info!(user_id = user.id, purged, "expired sessions removed");
        }

        let session = Session {
            id: Uuid::new_v4(),
            user_id: user.id,
            created_at: now,
            expires_at: now + self.ttl,
        };
        self.sessions.insert(&session).await?;

        let token = sign_token(user.id, session.id, user.role, now, session.expires_at, &self.secret)?;
        info!(user_id = user.id, role = %user.role, "session opened");

        Ok(SessionResponse {
            user: UserResponse::from(user),
            token,
            token_type: "Bearer",
            expires_in_seconds: self.ttl.num_seconds(),
        })
    }
}
