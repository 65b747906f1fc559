use crate::config::Config;
use crate::error::{AppError, AuthError};
use actix_web::cookie::{
    time::{Duration as CookieDuration, OffsetDateTime},
    Cookie, SameSite,
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "token";

/// How long an issued token validates.
pub const SESSION_TTL_HOURS: i64 = 12;

/// Lifetime of the session cookie in the browser. Longer than the token on purpose:
/// an expired token inside a live cookie is rejected as `ExpiredToken`.
pub const SESSION_COOKIE_HOURS: i64 = 24;

/// Represents the claims encoded within a session token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    pub user_id: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Issues and validates session tokens with the process-wide HMAC secret.
///
/// Built once at startup and shared read-only between workers. Replacing the
/// secret invalidates every outstanding session.
#[derive(Clone)]
pub struct SessionManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl SessionManager {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against an explicit clock in `validate_at`.
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::hours(SESSION_TTL_HOURS),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.jwt_secret)
    }

    /// Signs a token for `user_id` that expires 12 hours from now.
    pub fn issue(&self, user_id: i64) -> Result<String, AppError> {
        self.issue_at(user_id, Utc::now())
    }

    pub fn issue_at(&self, user_id: i64, now: DateTime<Utc>) -> Result<String, AppError> {
        let claims = Claims {
            user_id,
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Resolves a cookie value to the user id it was issued for.
    pub fn validate(&self, token: Option<&str>) -> Result<i64, AuthError> {
        self.validate_at(token, Utc::now())
    }

    pub fn validate_at(&self, token: Option<&str>, now: DateTime<Utc>) -> Result<i64, AuthError> {
        let token = match token {
            Some(token) if !token.is_empty() => token,
            _ => return Err(AuthError::MissingToken),
        };

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("Rejected session token: {}", e);
                AuthError::InvalidToken
            })?;

        if claims.exp <= now.timestamp() {
            return Err(AuthError::ExpiredToken);
        }
        Ok(claims.user_id)
    }
}

/// The cookie set on successful login.
pub fn session_cookie(token: &str, config: &Config) -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, token.to_string())
        .path("/")
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Lax)
        .expires(OffsetDateTime::now_utc() + CookieDuration::hours(SESSION_COOKIE_HOURS))
        .finish();
    if let Some(domain) = &config.cookie_domain {
        cookie.set_domain(domain.clone());
    }
    cookie
}

/// Overwrites the session cookie with an empty, already expired one so the client drops it.
pub fn removal_cookie(config: &Config) -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::ZERO)
        .expires(OffsetDateTime::now_utc() - CookieDuration::seconds(1))
        .finish();
    if let Some(domain) = &config.cookie_domain {
        cookie.set_domain(domain.clone());
    }
    cookie
}
