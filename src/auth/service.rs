use std::sync::Arc;

use actix_web::web;
use validator::Validate;

use crate::auth::password::PasswordHasher;
use crate::auth::token::SessionManager;
use crate::error::AppError;
use crate::models::{Credentials, NewUser, UserResponse};
use crate::store::UserStore;

/// Signup and login, written against the store and hasher traits.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
    sessions: Arc<SessionManager>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: Arc<dyn PasswordHasher>,
        sessions: Arc<SessionManager>,
    ) -> Self {
        Self {
            users,
            hasher,
            sessions,
        }
    }

    /// Hashes the password and stores the new user.
    pub async fn signup(&self, credentials: Credentials) -> Result<UserResponse, AppError> {
        credentials.validate()?;

        let hasher = Arc::clone(&self.hasher);
        let password = credentials.password;
        // bcrypt is deliberately slow; keep it off the async workers.
        let password_hash = web::block(move || hasher.hash_password(&password)).await??;

        let user = self
            .users
            .create_user(NewUser {
                email: credentials.email,
                password_hash,
            })
            .await?;
        log::info!("Registered user {}", user.id);
        Ok(user.into())
    }

    /// Checks the credentials and returns a freshly signed session token.
    ///
    /// Empty fields, an unknown email and a wrong password all yield
    /// `AppError::InvalidCredentials` so that callers cannot enumerate accounts.
    pub async fn login(&self, credentials: Credentials) -> Result<String, AppError> {
        if credentials.validate().is_err() {
            return Err(AppError::InvalidCredentials);
        }

        let user = match self.users.find_user_by_email(&credentials.email).await {
            Ok(user) => user,
            Err(AppError::NotFound(_)) => {
                log::debug!("Login attempt for unknown email");
                return Err(AppError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };

        let hasher = Arc::clone(&self.hasher);
        let password = credentials.password;
        let password_hash = user.password_hash.clone();
        let matches =
            web::block(move || hasher.verify_password(&password, &password_hash)).await??;
        if !matches {
            log::debug!("Wrong password for user {}", user.id);
            return Err(AppError::InvalidCredentials);
        }

        self.sessions.issue(user.id)
    }
}
