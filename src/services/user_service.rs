use std::sync::Arc;

use tracing::info;

use crate::auth::password::hash_password;
use crate::dtos::user::{CreateUserRequest, UpdateUserRequest, UserResponse};
use crate::error::AppError;
use crate::models::user::{NewUser, Role, User, UserChanges, UserStatus};
use crate::repository::users::EMAIL_TAKEN;
use crate::repository::UserRepository;
use crate::validation;

const USER_NOT_FOUND: &str = "Usuario no encontrado";

/// Contact fields shared by the admin edit form and the client profile form.
#[derive(Debug, Default)]
pub struct ProfileFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub company: Option<String>,
    pub tax_id: Option<String>,
}

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, bcrypt_cost: u32) -> Self {
        Self { users, bcrypt_cost }
    }

    pub(crate) fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }

    pub async fn list_users(&self) -> Result<Vec<UserResponse>, AppError> {
        let users = self.users.list().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn get_user(&self, id: i64) -> Result<UserResponse, AppError> {
        self.find(id).await.map(UserResponse::from)
    }

    pub async fn create_user(&self, req: CreateUserRequest) -> Result<UserResponse, AppError> {
        let name = validation::required(req.name.as_deref(), "El nombre es obligatorio")?;
        let email = validation::required(req.email.as_deref(), "El email es obligatorio")?;
        let email = validation::email(&email)?;
        let password = req
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::validation("La contraseña es obligatoria"))?;
        validation::password(&password)?;

        // The unique index is the real guard; this only yields a clearer message.
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict(EMAIL_TAKEN));
        }

        let password_hash = hash_password(&password, self.bcrypt_cost).await?;
        let user = self
            .users
            .insert(NewUser {
                name,
                email,
                password_hash,
                phone: validation::optional(req.phone),
                address: validation::optional(req.address),
                company: validation::optional(req.company),
                tax_id: validation::optional(req.tax_id),
                role: req.role.unwrap_or(Role::Client),
                status: req.status.unwrap_or(UserStatus::Active),
            })
            .await?;

        info!(user_id = user.id, role = %user.role, "user created");
        Ok(UserResponse::from(user))
    }

    /// `actor_id` is the admin doing the edit. Admins may edit their own
    /// contact fields but cannot demote or deactivate themselves.
    pub async fn update_user(&self, actor_id: i64, id: i64, req: UpdateUserRequest) -> Result<UserResponse, AppError> {
        if actor_id == id {
            let demoted = req.role.is_some_and(|r| r != Role::Admin);
            let deactivated = req.status.is_some_and(|s| s != UserStatus::Active);
            if demoted || deactivated {
                return Err(AppError::forbidden("No puedes cambiar tu propio rol ni desactivar tu cuenta"));
            }
        }

        let fields = ProfileFields {
            name: req.name,
            email: req.email,
            phone: req.phone,
            address: req.address,
            company: req.company,
            tax_id: req.tax_id,
        };
        let mut changes = self.profile_changes(id, fields).await?;
        changes.role = req.role;
        changes.status = req.status;

        let password = req.password.filter(|p| !p.is_empty());
        if let Some(password) = &password {
            validation::password(password)?;
        }

        let user = self.apply_changes(id, changes).await?;

        if let Some(password) = password {
            self.set_password(id, &password).await?;
        }

        info!(user_id = id, "user updated");
        Ok(UserResponse::from(user))
    }

    /// `actor_id` is the admin performing the deletion.
    pub async fn delete_user(&self, actor_id: i64, id: i64) -> Result<(), AppError> {
        if actor_id == id {
            return Err(AppError::forbidden("No puedes eliminar tu propia cuenta"));
        }
        let removed = self.users.delete(id).await?;
        if removed == 0 {
            return Err(AppError::not_found(USER_NOT_FOUND));
        }
        info!(user_id = id, deleted_by = actor_id, "user deleted");
        Ok(())
    }

    /// Creates the configured admin account unless the email is already taken.
    /// Returns whether an account was created.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<bool, AppError> {
        let email = validation::email(email)?;
        if self.users.find_by_email(&email).await?.is_some() {
            return Ok(false);
        }
        self.create_user(CreateUserRequest {
            name: Some("Administrador".to_string()),
            email: Some(email),
            password: Some(password.to_string()),
            role: Some(Role::Admin),
            ..Default::default()
        })
        .await?;
        Ok(true)
    }

    pub(crate) async fn find(&self, id: i64) -> Result<User, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))
    }

    /// Validates contact fields for user `id`. The user must exist and a new
    /// email must not belong to anybody else.
    pub(crate) async fn profile_changes(&self, id: i64, fields: ProfileFields) -> Result<UserChanges, AppError> {
        self.find(id).await?;

        let name = match fields.name {
            Some(name) => Some(validation::required(Some(name.as_str()), "El nombre no puede estar vacío")?),
            None => None,
        };

        let email = match fields.email {
            Some(email) => {
                let email = validation::email(&email)?;
                if let Some(owner) = self.users.find_by_email(&email).await? {
                    if owner.id != id {
                        return Err(AppError::conflict(EMAIL_TAKEN));
                    }
                }
                Some(email)
            }
            None => None,
        };

        Ok(UserChanges {
            name,
            email,
            phone: validation::clearable(fields.phone),
            address: validation::clearable(fields.address),
            company: validation::clearable(fields.company),
            tax_id: validation::clearable(fields.tax_id),
            role: None,
            status: None,
        })
    }

    pub(crate) async fn apply_changes(&self, id: i64, changes: UserChanges) -> Result<User, AppError> {
        self.users
            .update(id, changes)
            .await?
            .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))
    }

    pub(crate) async fn set_password(&self, id: i64, password: &str) -> Result<(), AppError> {
        let hash = hash_password(password, self.bcrypt_cost).await?;
        if !self.users.update_password(id, &hash).await? {
            return Err(AppError::not_found(USER_NOT_FOUND));
        }
        Ok(())
    }
}
