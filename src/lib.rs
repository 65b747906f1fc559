#![doc = "The `tasklist` library crate."]
#![doc = ""]
#![doc = "A multi-user task tracker whose interesting part is the authentication and"]
#![doc = "authorization boundary: bcrypt credentials, signed cookie sessions, double-submit"]
#![doc = "CSRF protection and owner-scoped task storage. The binary (`main.rs`) only reads"]
#![doc = "configuration, picks a store and starts the server."]

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;

pub use crate::app::AppState;
pub use crate::config::Config;
pub use crate::error::{AppError, AuthError};
