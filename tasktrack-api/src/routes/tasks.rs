/// Task endpoints
///
/// All routes sit behind the session token layer, which injects the caller's
/// `AuthContext`. A task owned by someone else is reported exactly like a
/// missing one (`404`).
///
/// - `GET    /api/tasks` - List own tasks, newest first
/// - `POST   /api/tasks` - Create a task
/// - `GET    /api/tasks/:id` - Get a task
/// - `PUT    /api/tasks/:id` - Update a task
/// - `DELETE /api/tasks/:id` - Delete a task

use crate::{
    app::AppState,
    error::ApiResult,
    routes::validate_request,
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tasktrack_shared::{
    auth::middleware::AuthContext,
    models::task::{Task, TaskStatus},
    tasks::TaskInput,
};
use validator::Validate;

/// Create and update request body
#[derive(Debug, Deserialize, Validate)]
pub struct TaskRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    /// Defaults to `pending` on create; left unchanged on update when omitted
    pub status: Option<TaskStatus>,
}

impl TaskRequest {
    fn into_input(self) -> ApiResult<TaskInput> {
        validate_request(&self, &[("title", self.title.as_str())])?;

        Ok(TaskInput {
            title: self.title,
            description: self.description,
            status: self.status,
        })
    }
}

/// Delete response
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// List the caller's tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = state.tasks.list(&auth).await?;
    Ok(Json(tasks))
}

/// Get one of the caller's tasks
///
/// # Errors
///
/// - `400 Bad Request`: Non-numeric id
/// - `404 Not Found`: No such task, or owned by someone else
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Task>> {
    let Path(id) = id?;
    let task = state.tasks.get(&auth, id).await?;
    Ok(Json(task))
}

/// Create a task owned by the caller
///
/// # Endpoint
///
/// ```text
/// POST /api/tasks
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// {
///   "title": "Write report",
///   "description": "Q3 numbers",
///   "status": "in_progress"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed JSON or unknown status
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<TaskRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let Json(req) = payload?;
    let task = state.tasks.create(&auth, req.into_input()?).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Update one of the caller's tasks
///
/// Title and description are replaced; status is replaced only when present.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<TaskRequest>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let Path(id) = id?;
    let Json(req) = payload?;
    let task = state.tasks.update(&auth, id, req.into_input()?).await?;
    Ok(Json(task))
}

/// Delete one of the caller's tasks
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path(id) = id?;
    state.tasks.delete(&auth, id).await?;
    Ok(Json(MessageResponse {
        message: "Task deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_status_is_optional() {
        let req: TaskRequest = serde_json::from_str(r#"{"title": "Write report"}"#).unwrap();
        let input = req.into_input().unwrap();

        assert_eq!(input, TaskInput::titled("Write report"));
    }

    #[test]
    fn test_request_parses_snake_case_status() {
        let req: TaskRequest =
            serde_json::from_str(r#"{"title": "t", "status": "in_progress"}"#).unwrap();
        assert_eq!(req.status, Some(TaskStatus::InProgress));

        assert!(serde_json::from_str::<TaskRequest>(r#"{"title": "t", "status": "DONE"}"#).is_err());
    }

    #[test]
    fn test_blank_title_rejected() {
        let req: TaskRequest = serde_json::from_str(r#"{"title": "   "}"#).unwrap();
        assert!(req.into_input().is_err());

        let long = TaskRequest {
            title: "x".repeat(201),
            description: None,
            status: None,
        };
        assert!(long.into_input().is_err());
    }
}
