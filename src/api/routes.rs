use axum::{
    middleware,
    response::Json,
    routing::{delete, get, patch, post, put},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::auth::{api as auth_api, auth_middleware, AuthState, JwtHandler, UserStore};
use crate::middleware::request_logging;
use crate::todos::{api as todos_api, TodoStore, TodosState};

/// Create the API router.
///
/// Registration, token issuance, and the health check are public; everything
/// else sits behind the JWT auth middleware.
pub fn create_router(
    user_store: Arc<UserStore>,
    todo_store: Arc<TodoStore>,
    jwt_handler: Arc<JwtHandler>,
) -> Router {
    let auth_state = AuthState::new(user_store, jwt_handler.clone());
    let todos_state = TodosState { store: todo_store };

    let public = Router::new()
        .route("/healthy", get(health_check))
        .route("/auth/", post(auth_api::register))
        .route("/token", post(auth_api::login_for_access_token))
        .with_state(auth_state.clone());

    let user_routes = Router::new()
        .route("/user", get(auth_api::get_current_user))
        .route("/user/password", put(auth_api::change_password))
        .route("/user/phone_number", put(auth_api::change_phone_number))
        .with_state(auth_state);

    let todo_routes = Router::new()
        .route("/todos", get(todos_api::read_all))
        .route("/todos/stats", get(todos_api::get_todo_stats))
        .route("/todos/todo", post(todos_api::create_todo))
        .route(
            "/todos/todo/:todo_id",
            get(todos_api::read_todo)
                .put(todos_api::update_todo)
                .delete(todos_api::delete_todo),
        )
        .route(
            "/todos/todo/:todo_id/toggle",
            patch(todos_api::toggle_todo_completion),
        )
        .route("/admin/todo", get(todos_api::admin_read_all))
        .route("/admin/todo/:todo_id", delete(todos_api::admin_delete_todo))
        .with_state(todos_state);

    let protected = user_routes.merge(todo_routes).route_layer(
        middleware::from_fn_with_state(jwt_handler, auth_middleware),
    );

    public
        .merge(protected)
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(request_logging))
}

/// Health check endpoint - GET /healthy
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Healthy".to_string(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}
