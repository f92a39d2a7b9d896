//! User service
//!
//! Registration, login and session handling plus account management.
//! The first account ever registered becomes the admin; everyone after
//! that starts as a plain user and only an admin can promote them.

use crate::db::repositories::{is_unique_violation, SessionRepository, UserRepository};
use crate::models::{ListParams, PagedResult, Session, UpdateUserInput, User, UserRole};
use crate::services::password::{hash_password, verify_password};
use anyhow::Context;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Default session lifetime in days
const DEFAULT_SESSION_EXPIRATION_DAYS: i64 = 7;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("User not found")]
    NotFound,

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterInput {
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

impl LoginInput {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Token plus the account it belongs to
#[derive(Debug, Clone, Serialize)]
pub struct AuthResult {
    pub token: String,
    pub user: User,
}

pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    session_repo: Arc<dyn SessionRepository>,
    session_expiration_days: i64,
}

impl UserService {
    pub fn new(user_repo: Arc<dyn UserRepository>, session_repo: Arc<dyn SessionRepository>) -> Self {
        Self::with_session_expiration(user_repo, session_repo, DEFAULT_SESSION_EXPIRATION_DAYS)
    }

    pub fn with_session_expiration(
        user_repo: Arc<dyn UserRepository>,
        session_repo: Arc<dyn SessionRepository>,
        session_expiration_days: i64,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            session_expiration_days,
        }
    }

    pub fn session_expiration_days(&self) -> i64 {
        self.session_expiration_days
    }

    /// Create an account and log it in.
    pub async fn register(&self, input: RegisterInput) -> Result<AuthResult, UserServiceError> {
        let name = input.name.trim().to_string();
        let email = input.email.trim().to_string();
        let password = input.password.trim();

        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(UserServiceError::ValidationError(
                "Name, email and password are required".to_string(),
            ));
        }
        validate_email(&email)?;

        self.ensure_email_free(&email).await?;

        // The repository promotes the very first account to admin
        let password_hash = hash_password(password)?;
        let user = self
            .user_repo
            .create_account(&User::new(name, email, password_hash, UserRole::User))
            .await
            .map_err(map_email_conflict)?;

        info!("Registered user {} with role {}", user.id, user.role);

        let session = self.create_session(user.id).await?;
        Ok(AuthResult {
            token: session.id,
            user,
        })
    }

    /// Check credentials and open a new session.
    pub async fn login(&self, input: LoginInput) -> Result<AuthResult, UserServiceError> {
        let email = input.email.trim();
        let user = self
            .user_repo
            .get_by_email(email)
            .await
            .context("Failed to get user by email")?
            .ok_or_else(|| UserServiceError::AuthenticationError(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(input.password.trim(), &user.password_hash)? {
            debug!("Wrong password for user {}", user.id);
            return Err(UserServiceError::AuthenticationError(
                INVALID_CREDENTIALS.to_string(),
            ));
        }

        let session = self.create_session(user.id).await?;
        Ok(AuthResult {
            token: session.id,
            user,
        })
    }

    pub async fn logout(&self, token: &str) -> Result<(), UserServiceError> {
        self.session_repo
            .delete(token)
            .await
            .context("Failed to delete session")?;
        Ok(())
    }

    /// The user behind a live session token.
    ///
    /// Expired sessions are removed on sight and yield `None`.
    pub async fn validate_session(&self, token: &str) -> Result<Option<User>, UserServiceError> {
        let session = match self
            .session_repo
            .get_by_id(token)
            .await
            .context("Failed to get session")?
        {
            Some(s) => s,
            None => return Ok(None),
        };

        if session.is_expired() {
            self.session_repo
                .delete(token)
                .await
                .context("Failed to delete expired session")?;
            return Ok(None);
        }

        let user = self
            .user_repo
            .get_by_id(session.user_id)
            .await
            .context("Failed to get user")?;
        Ok(user)
    }

    pub async fn get(&self, id: i64) -> Result<User, UserServiceError> {
        self.user_repo
            .get_by_id(id)
            .await
            .context("Failed to get user")?
            .ok_or(UserServiceError::NotFound)
    }

    /// All users, admins only
    pub async fn list(
        &self,
        requester: &User,
        params: &ListParams,
    ) -> Result<PagedResult<User>, UserServiceError> {
        if !requester.is_admin() {
            return Err(UserServiceError::Forbidden(
                "Only admins can list users".to_string(),
            ));
        }

        let (users, total) = self
            .user_repo
            .list(params.page as i64, params.per_page as i64)
            .await
            .context("Failed to list users")?;
        Ok(PagedResult::new(users, total, params))
    }

    pub async fn update(
        &self,
        requester: &User,
        id: i64,
        input: UpdateUserInput,
    ) -> Result<User, UserServiceError> {
        if !requester.can_manage(id) {
            return Err(UserServiceError::Forbidden(
                "You can only update your own account".to_string(),
            ));
        }
        if input.role.is_some() && !requester.is_admin() {
            return Err(UserServiceError::Forbidden(
                "Only admins can change roles".to_string(),
            ));
        }

        let mut user = self.get(id).await?;

        if let Some(name) = input.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(UserServiceError::ValidationError(
                    "Name cannot be empty".to_string(),
                ));
            }
            user.name = name.to_string();
        }

        if let Some(email) = input.email {
            let email = email.trim().to_string();
            validate_email(&email)?;
            if !email.eq_ignore_ascii_case(&user.email) {
                self.ensure_email_free(&email).await?;
            }
            user.email = email;
        }

        if let Some(password) = input.password {
            if password.trim().is_empty() {
                return Err(UserServiceError::ValidationError(
                    "Password cannot be empty".to_string(),
                ));
            }
            user.password_hash = hash_password(password.trim())?;
        }

        if let Some(role) = input.role {
            user.role = role;
        }

        let updated = self
            .user_repo
            .update(&user)
            .await
            .map_err(map_email_conflict)?;
        Ok(updated)
    }

    /// Remove an account; sessions and owned records go with it
    pub async fn delete(&self, requester: &User, id: i64) -> Result<(), UserServiceError> {
        if !requester.can_manage(id) {
            return Err(UserServiceError::Forbidden(
                "You can only delete your own account".to_string(),
            ));
        }
        self.get(id).await?;

        self.user_repo
            .delete(id)
            .await
            .context("Failed to delete user")?;
        info!("Deleted user {}", id);
        Ok(())
    }

    /// Drop every expired session, returning how many went
    pub async fn cleanup_expired_sessions(&self) -> Result<u64, UserServiceError> {
        let count = self
            .session_repo
            .delete_expired()
            .await
            .context("Failed to delete expired sessions")?;
        Ok(count)
    }

    async fn ensure_email_free(&self, email: &str) -> Result<(), UserServiceError> {
        let existing = self
            .user_repo
            .get_by_email(email)
            .await
            .context("Failed to check email")?;
        if existing.is_some() {
            return Err(email_in_use());
        }
        Ok(())
    }

    async fn create_session(&self, user_id: i64) -> Result<Session, UserServiceError> {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4().to_string(),
            user_id,
            expires_at: now + Duration::days(self.session_expiration_days),
            created_at: now,
        };

        let created = self
            .session_repo
            .create(&session)
            .await
            .context("Failed to create session")?;
        Ok(created)
    }
}

fn email_in_use() -> UserServiceError {
    UserServiceError::Conflict("Email already in use".to_string())
}

/// A duplicate that slips past `ensure_email_free` still reads as a conflict
fn map_email_conflict(err: anyhow::Error) -> UserServiceError {
    if is_unique_violation(&err) {
        email_in_use()
    } else {
        UserServiceError::InternalError(err.context("Failed to save user"))
    }
}

fn validate_email(email: &str) -> Result<(), UserServiceError> {
    if !email.contains('@') {
        return Err(UserServiceError::ValidationError(
            "Invalid email format".to_string(),
        ));
    }
    Ok(())
}
