// src/state.rs
use std::sync::Arc;

use chrono::Duration;
use sqlx::PgPool;

use crate::config::Config;
use crate::repository::{
    BusinessRepository, ContactRepository, PgBusinessRepository, PgContactRepository, PgSessionRepository,
    PgUserRepository, SessionRepository, UserRepository,
};
use crate::services::{AdminService, AuthService, ClientService, ContactService, UserService};

/// Storage backends the services are built on.
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub business: Arc<dyn BusinessRepository>,
    pub contact: Arc<dyn ContactRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            sessions: Arc::new(PgSessionRepository::new(pool.clone())),
            business: Arc::new(PgBusinessRepository::new(pool.clone())),
            contact: Arc::new(PgContactRepository::new(pool)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SecuritySettings {
    pub session_secret: String,
    pub session_ttl: Duration,
    pub bcrypt_cost: u32,
    pub cookie_secure: bool,
}

impl From<&Config> for SecuritySettings {
    fn from(config: &Config) -> Self {
        Self {
            session_secret: config.session_secret.clone(),
            session_ttl: Duration::hours(config.session_ttl_hours),
            bcrypt_cost: config.bcrypt_cost,
            cookie_secure: config.cookie_secure,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub auth: AuthService,
    pub client: ClientService,
    pub admin: AdminService,
    pub contact: ContactService,
    pub cookie_secure: bool,
}

impl AppState {
    pub fn new(db_pool: PgPool, config: &Config) -> Self {
        Self::from_repositories(Repositories::postgres(db_pool), SecuritySettings::from(config))
    }

    pub fn from_repositories(repos: Repositories, settings: SecuritySettings) -> Self {
        let users = UserService::new(repos.users.clone(), settings.bcrypt_cost);
        let auth = AuthService::new(
            repos.users.clone(),
            repos.sessions,
            users.clone(),
            &settings.session_secret,
            settings.session_ttl,
        );
        let client = ClientService::new(repos.business.clone(), users.clone());
        let admin = AdminService::new(repos.users, repos.business);
        let contact = ContactService::new(repos.contact);

        Self {
            users,
            auth,
            client,
            admin,
            contact,
            cookie_secure: settings.cookie_secure,
        }
    }
}
