//! Todo API Endpoints
//! Mission: Ownership-scoped CRUD plus admin oversight

use crate::auth::models::{Claims, UserRole};
use crate::todos::models::{Todo, TodoRequest, TodoStats, ToggleResponse};
use crate::todos::store::TodoStore;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Extension,
};
use serde_json::json;
use std::sync::Arc;

/// Shared todo handler state
#[derive(Clone)]
pub struct TodosState {
    pub store: Arc<TodoStore>,
}

// ===== User endpoints =====

/// List caller's todos - GET /todos
pub async fn read_all(
    State(state): State<TodosState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Todo>>, TodoApiError> {
    let todos = state.store.list_for_owner(claims.id)?;
    Ok(Json(todos))
}

/// Get one owned todo - GET /todos/todo/{id}
pub async fn read_todo(
    State(state): State<TodosState>,
    Extension(claims): Extension<Claims>,
    Path(todo_id): Path<i64>,
) -> Result<Json<Todo>, TodoApiError> {
    state
        .store
        .get_for_owner(todo_id, claims.id)?
        .map(Json)
        .ok_or(TodoApiError::NotFound)
}

/// Create a todo owned by the caller - POST /todos/todo
pub async fn create_todo(
    State(state): State<TodosState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<TodoRequest>,
) -> Result<(StatusCode, Json<Todo>), TodoApiError> {
    payload.validate().map_err(TodoApiError::Validation)?;

    let todo = state.store.create(&payload, claims.id)?;
    Ok((StatusCode::CREATED, Json(todo)))
}

/// Full update of an owned todo - PUT /todos/todo/{id}
pub async fn update_todo(
    State(state): State<TodosState>,
    Extension(claims): Extension<Claims>,
    Path(todo_id): Path<i64>,
    Json(payload): Json<TodoRequest>,
) -> Result<StatusCode, TodoApiError> {
    payload.validate().map_err(TodoApiError::Validation)?;

    if !state.store.update_for_owner(todo_id, claims.id, &payload)? {
        return Err(TodoApiError::NotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Delete an owned todo - DELETE /todos/todo/{id}
pub async fn delete_todo(
    State(state): State<TodosState>,
    Extension(claims): Extension<Claims>,
    Path(todo_id): Path<i64>,
) -> Result<StatusCode, TodoApiError> {
    if !state.store.delete_for_owner(todo_id, claims.id)? {
        return Err(TodoApiError::NotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Flip completion of an owned todo - PATCH /todos/todo/{id}/toggle
pub async fn toggle_todo_completion(
    State(state): State<TodosState>,
    Extension(claims): Extension<Claims>,
    Path(todo_id): Path<i64>,
) -> Result<Json<ToggleResponse>, TodoApiError> {
    let todo = state
        .store
        .toggle_for_owner(todo_id, claims.id)?
        .ok_or(TodoApiError::NotFound)?;

    Ok(Json(ToggleResponse {
        id: todo.id,
        complete: todo.complete,
        message: "Todo status updated successfully".to_string(),
    }))
}

/// Caller's completion statistics - GET /todos/stats
pub async fn get_todo_stats(
    State(state): State<TodosState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<TodoStats>, TodoApiError> {
    let stats = state.store.stats_for_owner(claims.id)?;
    Ok(Json(stats))
}

// ===== Admin endpoints =====

/// List every user's todos - GET /admin/todo (admin only)
pub async fn admin_read_all(
    State(state): State<TodosState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Todo>>, TodoApiError> {
    require_admin(&claims)?;

    let todos = state.store.list_all()?;
    Ok(Json(todos))
}

/// Delete any todo - DELETE /admin/todo/{id} (admin only)
pub async fn admin_delete_todo(
    State(state): State<TodosState>,
    Extension(claims): Extension<Claims>,
    Path(todo_id): Path<i64>,
) -> Result<StatusCode, TodoApiError> {
    require_admin(&claims)?;

    if !state.store.delete_any(todo_id)? {
        return Err(TodoApiError::NotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}

fn require_admin(claims: &Claims) -> Result<(), TodoApiError> {
    if claims.role != UserRole::Admin {
        return Err(TodoApiError::Forbidden);
    }
    Ok(())
}

// ===== Error Handling =====

#[derive(Debug)]
pub enum TodoApiError {
    Database(anyhow::Error),
    NotFound,
    Forbidden,
    Validation(String),
}

impl From<anyhow::Error> for TodoApiError {
    fn from(err: anyhow::Error) -> Self {
        TodoApiError::Database(err)
    }
}

impl IntoResponse for TodoApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            TodoApiError::Database(err) => {
                tracing::error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            TodoApiError::NotFound => (StatusCode::NOT_FOUND, "Todo not found.".to_string()),
            TodoApiError::Forbidden => {
                (StatusCode::FORBIDDEN, "Insufficient permissions".to_string())
            }
            TodoApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let err = anyhow::anyhow!("Test error");
        let api_err: TodoApiError = err.into();

        match api_err {
            TodoApiError::Database(_) => (),
            _ => panic!("Expected Database error"),
        }
    }

    #[test]
    fn test_error_statuses() {
        assert_eq!(
            TodoApiError::NotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            TodoApiError::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            TodoApiError::Validation("bad".to_string())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_require_admin() {
        let admin = Claims {
            sub: "root".to_string(),
            id: 1,
            role: UserRole::Admin,
            exp: 0,
        };
        assert!(require_admin(&admin).is_ok());

        let user = Claims {
            sub: "alice".to_string(),
            id: 2,
            role: UserRole::User,
            exp: 0,
        };
        assert!(require_admin(&user).is_err());
    }
}
