pub mod auth;
pub mod health;
pub mod tasks;

use crate::auth::SessionGuard;
use actix_web::web;

/// Registers every route. Only the `/tasks` scope sits behind the session guard;
/// CSRF protection is applied around the whole app by the caller.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health)
        .service(auth::signup)
        .service(auth::login)
        .service(auth::logout)
        .service(auth::csrf_token)
        .service(
            web::scope("/tasks")
                .wrap(SessionGuard)
                .service(tasks::get_tasks)
                .service(tasks::create_task)
                .service(tasks::get_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        );
}
