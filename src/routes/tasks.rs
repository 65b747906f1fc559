use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::TaskInput,
    store::TaskStore,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use validator::Validate;

/// Task store handle shared by the task handlers.
pub type Tasks = web::Data<dyn TaskStore>;

/// Retrieves the authenticated user's tasks, oldest first.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects.
/// - `401 Unauthorized`: missing, invalid or expired session.
#[get("")]
pub async fn get_tasks(
    tasks: Tasks,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let tasks = tasks.list_tasks(user.0).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task owned by the authenticated user.
///
/// ## Responses:
/// - `201 Created`: the new `Task`.
/// - `400 Bad Request`: empty title.
/// - `401 Unauthorized`: missing, invalid or expired session.
/// - `403 Forbidden`: CSRF check failed.
#[post("")]
pub async fn create_task(
    tasks: Tasks,
    user: AuthenticatedUser,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = tasks.create_task(user.0, &task_data.title).await?;
    log::info!("User {} created task {}", user.0, task.id);
    Ok(HttpResponse::Created().json(task))
}

/// Retrieves a specific task by its ID.
///
/// ## Responses:
/// - `200 OK`: the `Task`.
/// - `404 Not Found`: the task does not exist or belongs to another user.
#[get("/{id}")]
pub async fn get_task(
    tasks: Tasks,
    user: AuthenticatedUser,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let task = tasks.get_task(user.0, task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Renames a task.
///
/// ## Responses:
/// - `200 OK`: the updated `Task`.
/// - `400 Bad Request`: empty title.
/// - `404 Not Found`: the task does not exist or belongs to another user.
#[put("/{id}")]
pub async fn update_task(
    tasks: Tasks,
    user: AuthenticatedUser,
    task_id: web::Path<i64>,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = tasks
        .update_title(user.0, task_id.into_inner(), &task_data.title)
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task by its ID.
///
/// ## Responses:
/// - `204 No Content`: on successful deletion.
/// - `404 Not Found`: the task does not exist or belongs to another user.
#[delete("/{id}")]
pub async fn delete_task(
    tasks: Tasks,
    user: AuthenticatedUser,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let task_id = task_id.into_inner();
    tasks.delete_task(user.0, task_id).await?;
    log::info!("User {} deleted task {}", user.0, task_id);
    Ok(HttpResponse::NoContent().finish())
}
