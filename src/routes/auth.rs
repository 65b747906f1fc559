use crate::{
    auth::{removal_cookie, session_cookie, AuthService, CsrfToken},
    config::Config,
    error::AppError,
    models::Credentials,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use serde_json::json;

/// Register a new user
///
/// ## Responses:
/// - `201 Created`: `{ "id", "email" }` of the new user.
/// - `400 Bad Request`: empty email or password, or a malformed body.
/// - `409 Conflict`: the email is already registered.
/// - `500 Internal Server Error`: store or hashing failure.
#[post("/signup")]
pub async fn signup(
    auth: web::Data<AuthService>,
    credentials: web::Json<Credentials>,
) -> Result<impl Responder, AppError> {
    let user = auth.signup(credentials.into_inner()).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Login user
///
/// Sets the `token` session cookie on success. Every credential failure gets
/// the same opaque `500` response.
#[post("/login")]
pub async fn login(
    auth: web::Data<AuthService>,
    config: web::Data<Config>,
    credentials: web::Json<Credentials>,
) -> Result<impl Responder, AppError> {
    let token = auth.login(credentials.into_inner()).await?;
    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&token, &config))
        .finish())
}

/// Logout user
///
/// Clears the session cookie unconditionally. The token itself stays valid
/// until it expires if a copy exists elsewhere.
#[post("/logout")]
pub async fn logout(config: web::Data<Config>) -> impl Responder {
    HttpResponse::Ok().cookie(removal_cookie(&config)).finish()
}

/// Returns the CSRF token bound to this request so single-page clients can echo it.
#[get("/csrf")]
pub async fn csrf_token(token: CsrfToken) -> impl Responder {
    HttpResponse::Ok().json(json!({ "csrf_token": token.0 }))
}
