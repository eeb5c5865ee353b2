use crate::{
    auth::CurrentUser,
    error::AppError,
    models::{Page, Role, TaskInput, TaskUpdate},
    state::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde::Deserialize;
use validator::Validate;

/// Page size used when `limit` is not given.
pub const DEFAULT_LIST_LIMIT: u32 = 500;
/// Largest `limit` honoured; bigger values are clamped.
pub const MAX_LIST_LIMIT: u32 = 500;

/// Query parameters for listing tasks.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl ListQuery {
    pub fn page(&self) -> Page {
        Page::new(
            self.skip.unwrap_or(0),
            self.limit.unwrap_or(DEFAULT_LIST_LIMIT).min(MAX_LIST_LIMIT),
        )
    }
}

/// Lists tasks.
///
/// Regular users see only their own tasks; admins see every user's tasks.
/// Tasks are returned in creation order.
///
/// ## Query Parameters:
/// - `skip` (optional): number of tasks to skip, default 0.
/// - `limit` (optional): maximum number of tasks to return, default and cap 500.
#[get("")]
pub async fn list_tasks(
    state: web::Data<AppState>,
    user: CurrentUser,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, AppError> {
    let owner = match user.role {
        Role::Admin => None,
        Role::User => Some(user.id),
    };

    let tasks = state.tasks.list_tasks(owner, query.page()).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task for the authenticated user.
///
/// The owner is always the caller; an owner field in the body is ignored.
///
/// ## Responses:
/// - `201 Created`: the new task.
/// - `422 Unprocessable Entity`: title empty or longer than 200 characters.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    user: CurrentUser,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = state
        .tasks
        .create_task(user.id, task_data.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(task))
}

/// Retrieves a specific task by its ID.
///
/// Tasks owned by someone else are reported as not found, for admins too.
#[get("/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    user: CurrentUser,
    task_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let task = state
        .tasks
        .get_task_for_owner(user.id, task_id.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    Ok(HttpResponse::Ok().json(task))
}

/// Partially updates a task the caller owns.
///
/// Only fields present in the body change; `null` clears `description` or
/// `due_date`.
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    user: CurrentUser,
    task_id: web::Path<i32>,
    task_data: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = state
        .tasks
        .get_task_for_owner(user.id, task_id.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    let updated = state
        .tasks
        .update_task(&task, task_data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// Deletes a task the caller owns.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    user: CurrentUser,
    task_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let task = state
        .tasks
        .get_task_for_owner(user.id, task_id.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    state.tasks.delete_task(&task).await?;

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_defaults_and_cap() {
        let query = ListQuery {
            skip: None,
            limit: None,
        };
        assert_eq!(query.page(), Page { skip: 0, limit: 500 });

        let query = ListQuery {
            skip: Some(10),
            limit: Some(10_000),
        };
        assert_eq!(query.page(), Page { skip: 10, limit: 500 });
    }
}
