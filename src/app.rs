//! Application wiring shared by the binary and the integration tests.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{
    http::{header, Method},
    web,
};

use crate::auth::{AuthService, PasswordHasher, SessionManager};
use crate::config::Config;
use crate::routes;
use crate::store::{TaskStore, UserStore};

/// Origin of the local development frontend, always allowed.
pub const DEV_ORIGIN: &str = "http://localhost:3000";

/// Everything the handlers pull from app data, built once at startup.
#[derive(Clone)]
pub struct AppState {
    config: web::Data<Config>,
    sessions: web::Data<SessionManager>,
    auth: web::Data<AuthService>,
    tasks: web::Data<dyn TaskStore>,
}

impl AppState {
    pub fn new(
        config: Config,
        users: Arc<dyn UserStore>,
        tasks: Arc<dyn TaskStore>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        let sessions = Arc::new(SessionManager::from_config(&config));
        let auth = AuthService::new(users, hasher, Arc::clone(&sessions));

        Self {
            config: web::Data::new(config),
            sessions: web::Data::from(sessions),
            auth: web::Data::new(auth),
            tasks: web::Data::from(tasks),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Registers app data and all routes.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.config.clone())
            .app_data(self.sessions.clone())
            .app_data(self.auth.clone())
            .app_data(self.tasks.clone());
        routes::config(cfg);
    }
}

/// CORS policy: the dev frontend plus `FE_URL`, credentials allowed so cookies flow.
pub fn cors(config: &Config) -> Cors {
    let mut cors = Cors::default().allowed_origin(DEV_ORIGIN);
    if let Some(origin) = &config.frontend_url {
        cors = cors.allowed_origin(origin);
    }

    cors.allowed_methods(vec![Method::GET, Method::PUT, Method::POST, Method::DELETE])
        .allowed_headers(vec![
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            header::HeaderName::from_static("x-csrf-token"),
        ])
        .supports_credentials()
        .max_age(3600)
}
