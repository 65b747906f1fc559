//! Double-submit CSRF protection.
//!
//! Every response carries an `_csrf` cookie. Single-page clients read the
//! same value from `GET /csrf` and echo it in the `X-CSRF-Token` header; a
//! state-changing request is only let through when header and cookie match.

use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    cookie::{time::Duration as CookieDuration, Cookie, SameSite},
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use rand::RngCore;

use crate::config::Config;
use crate::error::AppError;

pub const CSRF_COOKIE: &str = "_csrf";
pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// 32 random bytes, 64 hex characters.
const CSRF_TOKEN_BYTES: usize = 32;
const CSRF_COOKIE_HOURS: i64 = 24;

/// Generates a fresh random CSRF token as a hex string.
pub fn generate_csrf_token() -> String {
    let mut bytes = [0u8; CSRF_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Both values must be present, non-empty and identical byte for byte.
pub fn verify_csrf_token(cookie_value: Option<&str>, header_value: Option<&str>) -> bool {
    match (cookie_value, header_value) {
        (Some(cookie), Some(header)) if !cookie.is_empty() => {
            constant_time_eq(cookie.as_bytes(), header.as_bytes())
        }
        _ => false,
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |diff, (x, y)| diff | (x ^ y)) == 0
}

fn is_safe_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
    )
}

/// The CSRF token bound to the current request, put in extensions by [`CsrfGuard`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfToken(pub String);

impl FromRequest for CsrfToken {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<CsrfToken>().cloned() {
            Some(token) => ready(Ok(token)),
            None => ready(Err(AppError::Internal(
                "CSRF token not found in request. Ensure CsrfGuard is active.".to_string(),
            )
            .into())),
        }
    }
}

/// Middleware enforcing the double-submit check on unsafe methods.
#[derive(Debug, Clone)]
pub struct CsrfGuard {
    cookie_domain: Option<String>,
    cookie_http_only: bool,
}

impl CsrfGuard {
    pub fn from_config(config: &Config) -> Self {
        Self {
            cookie_domain: config.cookie_domain.clone(),
            cookie_http_only: config.csrf_cookie_http_only,
        }
    }

    /// Browsers drop `SameSite=None` cookies that lack `Secure`, so it is always set
    /// regardless of `COOKIE_SECURE`. Localhost counts as a secure context.
    fn cookie(&self, token: &str) -> Cookie<'static> {
        let mut cookie = Cookie::build(CSRF_COOKIE, token.to_string())
            .path("/")
            .http_only(self.cookie_http_only)
            .secure(true)
            .same_site(SameSite::None)
            .max_age(CookieDuration::hours(CSRF_COOKIE_HOURS))
            .finish();
        if let Some(domain) = &self.cookie_domain {
            cookie.set_domain(domain.clone());
        }
        cookie
    }
}

impl<S, B> Transform<S, ServiceRequest> for CsrfGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = CsrfGuardService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CsrfGuardService {
            service,
            guard: Rc::new(self.clone()),
        }))
    }
}

pub struct CsrfGuardService<S> {
    service: S,
    guard: Rc<CsrfGuard>,
}

impl<S, B> Service<ServiceRequest> for CsrfGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let cookie_token = req
            .cookie(CSRF_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty());

        if !is_safe_method(req.method()) {
            let header_token = req
                .headers()
                .get(CSRF_HEADER)
                .and_then(|value| value.to_str().ok());
            if !verify_csrf_token(cookie_token.as_deref(), header_token) {
                log::warn!("CSRF check failed for {} {}", req.method(), req.path());
                let res = req
                    .error_response(AppError::CsrfMismatch)
                    .map_into_right_body();
                return Box::pin(ready(Ok(res)));
            }
        }

        let token = cookie_token.unwrap_or_else(generate_csrf_token);
        let cookie = self.guard.cookie(&token);
        req.extensions_mut().insert(CsrfToken(token));

        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = fut.await?;
            // Refreshes the cookie expiry, or hands out a token on first contact.
            if let Err(e) = res.response_mut().add_cookie(&cookie) {
                log::error!("Failed to set CSRF cookie: {}", e);
            }
            Ok(res.map_into_left_body())
        })
    }
}
