#![allow(dead_code)]

use std::sync::Arc;

use actix_http::Request;
use actix_web::{
    body::MessageBody,
    cookie::Cookie,
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test,
};
use serde_json::{json, Value};
use tasklist::{
    app::AppState,
    auth::{
        csrf::{CSRF_COOKIE, CSRF_HEADER},
        token::SESSION_COOKIE,
        BcryptHasher,
    },
    config::Config,
    store::MemoryStore,
};

pub const TEST_SECRET: &str = "integration_test_secret";
pub const TEST_FRONTEND: &str = "https://app.example.com";

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "JWT_SECRET" => Some(TEST_SECRET.to_string()),
        "API_DOMAIN" => Some("localhost".to_string()),
        "FE_URL" => Some(TEST_FRONTEND.to_string()),
        _ => None,
    })
    .expect("test config")
}

/// Fresh app state over an empty in-memory store, with a cheap bcrypt cost.
pub fn test_state() -> AppState {
    let store = Arc::new(MemoryStore::new());
    AppState::new(
        test_config(),
        store.clone(),
        store,
        Arc::new(BcryptHasher::new(4)),
    )
}

/// Builds the full middleware stack the binary runs with.
macro_rules! init_app {
    () => {{
        let state = common::test_state();
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(tasklist::auth::CsrfGuard::from_config(state.config()))
                .wrap(tasklist::app::cors(state.config()))
                .wrap(actix_web::middleware::Logger::default())
                .configure(|cfg| state.configure(cfg)),
        )
        .await
    }};
}

/// Cookie jar of one browser: the CSRF token and, once logged in, the session token.
#[derive(Debug, Clone)]
pub struct Browser {
    pub csrf: String,
    pub session: Option<String>,
}

impl Browser {
    /// Attaches both cookies and echoes the CSRF token in the header.
    pub fn send(&self, req: test::TestRequest) -> Request {
        self.with_cookies(req)
            .insert_header((CSRF_HEADER, self.csrf.clone()))
            .to_request()
    }

    /// Attaches both cookies but leaves out the CSRF header.
    pub fn send_without_csrf_header(&self, req: test::TestRequest) -> Request {
        self.with_cookies(req).to_request()
    }

    fn with_cookies(&self, req: test::TestRequest) -> test::TestRequest {
        let mut req = req.cookie(Cookie::new(CSRF_COOKIE, self.csrf.clone()));
        if let Some(token) = &self.session {
            req = req.cookie(Cookie::new(SESSION_COOKIE, token.clone()));
        }
        req
    }
}

pub fn response_cookie<B>(resp: &ServiceResponse<B>, name: &str) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == name)
        .map(|c| c.into_owned())
}

/// Reads the status and the JSON body (or `Null` for an empty body).
pub async fn status_and_json<B: MessageBody>(resp: ServiceResponse<B>) -> (StatusCode, Value) {
    let status = resp.status();
    let bytes = test::read_body(resp).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            panic!("Body is not JSON: {:?}", String::from_utf8_lossy(&bytes))
        })
    };
    (status, body)
}

/// `GET /csrf` like a single-page client does on startup.
pub async fn open_browser<S, B>(app: &S) -> Browser
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, test::TestRequest::get().uri("/csrf").to_request()).await;
    let cookie = response_cookie(&resp, CSRF_COOKIE).expect("csrf cookie");
    let (status, body) = status_and_json(resp).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["csrf_token"], cookie.value());

    Browser {
        csrf: cookie.value().to_string(),
        session: None,
    }
}

pub async fn signup<S, B>(
    app: &S,
    browser: &Browser,
    email: &str,
    password: &str,
) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = browser.send(
        test::TestRequest::post()
            .uri("/signup")
            .set_json(json!({ "email": email, "password": password })),
    );
    status_and_json(test::call_service(app, req).await).await
}

/// Logs in and stores the session cookie in `browser`. Returns the status.
pub async fn login<S, B>(app: &S, browser: &mut Browser, email: &str, password: &str) -> StatusCode
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = browser.send(
        test::TestRequest::post()
            .uri("/login")
            .set_json(json!({ "email": email, "password": password })),
    );
    let resp = test::call_service(app, req).await;
    if let Some(cookie) = response_cookie(&resp, SESSION_COOKIE) {
        browser.session = Some(cookie.value().to_string());
    }
    resp.status()
}

/// A browser with a registered, logged-in user.
pub async fn logged_in<S, B>(app: &S, email: &str) -> Browser
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let mut browser = open_browser(app).await;
    let (status, _) = signup(app, &browser, email, "secret123").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(login(app, &mut browser, email, "secret123").await, StatusCode::OK);
    browser
}
