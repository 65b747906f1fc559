//! Authentication and authorization boundary: password hashing, session
//! tokens, CSRF protection and the acting-user extractor.

pub mod csrf;
pub mod extractors;
pub mod middleware;
pub mod password;
pub mod service;
pub mod token;

// Re-export necessary items
pub use csrf::{generate_csrf_token, verify_csrf_token, CsrfGuard, CsrfToken};
pub use extractors::AuthenticatedUser;
pub use middleware::SessionGuard;
pub use password::{BcryptHasher, PasswordHasher};
pub use service::AuthService;
pub use token::{removal_cookie, session_cookie, Claims, SessionManager};
