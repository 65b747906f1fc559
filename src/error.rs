//!
//! # Custom Error Handling
//!
//! This module defines the `AppError` type used throughout the application.
//! Every failure of the authentication boundary and of the task store is
//! expressed as one of its variants, and each variant maps to exactly one
//! HTTP status at the boundary.
//!
//! `AppError` implements `actix_web::error::ResponseError`, so handlers and
//! middlewares can return it directly. `From` implementations for `AuthError`,
//! `sqlx::Error`, `validator::ValidationErrors`, `bcrypt::BcryptError` and
//! `BlockingError` allow propagation with the `?` operator.

use actix_web::{error::BlockingError, error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Why a session token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// No session cookie, or an empty one (e.g. after logout).
    MissingToken,
    /// Signature or format check failed.
    InvalidToken,
    /// Signature is fine but the expiry has passed.
    ExpiredToken,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "missing session token"),
            AuthError::InvalidToken => write!(f, "invalid session token"),
            AuthError::ExpiredToken => write!(f, "expired session token"),
        }
    }
}

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or empty input (HTTP 400).
    Validation(String),
    /// Session token missing, tampered with or expired (HTTP 401).
    Auth(AuthError),
    /// Login failed. Unknown email, wrong password and empty fields are
    /// indistinguishable (HTTP 500, like every other login failure).
    InvalidCredentials,
    /// The CSRF header is absent or does not match the CSRF cookie (HTTP 403).
    CsrfMismatch,
    /// Task absent or not owned by the caller; the two are not distinguished (HTTP 404).
    NotFound(String),
    /// Signup with an email that is already registered (HTTP 409).
    DuplicateEmail,
    /// Underlying persistence failure (HTTP 500).
    Store(String),
    /// Password hashing or verification failure (HTTP 500).
    Hashing(String),
    /// Any other unexpected server-side failure (HTTP 500).
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Auth(kind) => write!(f, "Unauthorized: {}", kind),
            AppError::InvalidCredentials => write!(f, "Login failed: invalid credentials"),
            AppError::CsrfMismatch => write!(f, "Forbidden: invalid csrf token"),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::DuplicateEmail => write!(f, "Conflict: email already registered"),
            AppError::Store(msg) => write!(f, "Store Error: {}", msg),
            AppError::Hashing(msg) => write!(f, "Hashing Error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl AppError {
    /// Message sent to the client. Server-side failures keep their details in the logs.
    fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::Auth(kind) => kind.to_string(),
            AppError::InvalidCredentials => "invalid credentials".into(),
            AppError::CsrfMismatch => "invalid csrf token".into(),
            AppError::DuplicateEmail => "email already registered".into(),
            AppError::Store(_) | AppError::Hashing(_) | AppError::Internal(_) => {
                "internal server error".into()
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(error: AuthError) -> AppError {
        AppError::Auth(error)
    }
}

/// Converts `AppError` variants into JSON `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::CsrfMismatch => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateEmail => StatusCode::CONFLICT,
            AppError::InvalidCredentials
            | AppError::Store(_)
            | AppError::Hashing(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Failed logins are client mistakes and stay out of the error log.
        if self.status_code().is_server_error() && !matches!(self, AppError::InvalidCredentials) {
            log::error!("{}", self);
        }
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.public_message()
        }))
    }
}

/// `RowNotFound` becomes `NotFound`; everything else is a store failure.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::Store(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::Validation(error.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Hashing(error.to_string())
    }
}

impl From<BlockingError> for AppError {
    fn from(error: BlockingError) -> AppError {
        AppError::Internal(error.to_string())
    }
}
