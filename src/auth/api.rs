//! Authentication API Endpoints
//! Mission: Registration, token issuance, and profile management

use crate::auth::{
    jwt::JwtHandler,
    models::{
        Claims, CreateUserRequest, PasswordChangeRequest, TokenRequest, TokenResponse,
        UserResponse,
    },
    password::verify_password,
    user_store::UserStore,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Form, Json,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Shared auth state
#[derive(Clone)]
pub struct AuthState {
    pub user_store: Arc<UserStore>,
    pub jwt_handler: Arc<JwtHandler>,
}

impl AuthState {
    pub fn new(user_store: Arc<UserStore>, jwt_handler: Arc<JwtHandler>) -> Self {
        Self {
            user_store,
            jwt_handler,
        }
    }
}

/// Register endpoint - POST /auth/
pub async fn register(
    State(state): State<AuthState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AuthApiError> {
    if payload.password.len() < 6 {
        return Err(AuthApiError::WeakPassword);
    }

    let user = state.user_store.create_user(&payload).map_err(|e| {
        warn!("Failed to create user {}: {}", payload.username, e);
        AuthApiError::UserAlreadyExists
    })?;

    info!("User registered: {} ({})", user.username, user.role.as_str());

    Ok((StatusCode::CREATED, Json(UserResponse::from_user(&user))))
}

/// Token endpoint - POST /token
///
/// Accepts form-encoded credentials (OAuth2 password flow) and returns a
/// bearer token on success.
pub async fn login_for_access_token(
    State(state): State<AuthState>,
    Form(payload): Form<TokenRequest>,
) -> Result<Json<TokenResponse>, AuthApiError> {
    let user = state
        .user_store
        .authenticate(&payload.username, &payload.password)
        .map_err(|_| AuthApiError::InternalError)?
        .ok_or_else(|| {
            warn!("Failed login attempt: {}", payload.username);
            AuthApiError::InvalidCredentials
        })?;

    let access_token = state
        .jwt_handler
        .issue_token(&user)
        .map_err(|_| AuthApiError::InternalError)?;

    info!("Login successful: {} ({})", user.username, user.role.as_str());

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// Get current user profile - GET /user
pub async fn get_current_user(
    State(state): State<AuthState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<UserResponse>, AuthApiError> {
    let user = state
        .user_store
        .get_user_by_id(claims.id)
        .map_err(|_| AuthApiError::InternalError)?
        .ok_or(AuthApiError::UserNotFound)?;

    Ok(Json(UserResponse::from_user(&user)))
}

/// Change password - PUT /user/password
pub async fn change_password(
    State(state): State<AuthState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<PasswordChangeRequest>,
) -> Result<StatusCode, AuthApiError> {
    let user = state
        .user_store
        .get_user_by_id(claims.id)
        .map_err(|_| AuthApiError::InternalError)?
        .ok_or(AuthApiError::UserNotFound)?;

    let old_password_ok = verify_password(&payload.password, &user.hashed_password)
        .map_err(|_| AuthApiError::InternalError)?;
    if !old_password_ok {
        return Err(AuthApiError::PasswordChangeDenied);
    }

    state
        .user_store
        .update_password(user.id, &payload.new_password)
        .map_err(|_| AuthApiError::InternalError)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Update phone number - PUT /user/phone_number
pub async fn change_phone_number(
    State(state): State<AuthState>,
    Extension(claims): Extension<Claims>,
    Json(phone_number): Json<String>,
) -> Result<StatusCode, AuthApiError> {
    state
        .user_store
        .update_phone_number(claims.id, &phone_number)
        .map_err(|_| AuthApiError::UserNotFound)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Auth API errors
#[derive(Debug)]
pub enum AuthApiError {
    InvalidCredentials,
    PasswordChangeDenied,
    UserNotFound,
    UserAlreadyExists,
    WeakPassword,
    InternalError,
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Could not validate user.")
            }
            AuthApiError::PasswordChangeDenied => {
                (StatusCode::UNAUTHORIZED, "Error on password change.")
            }
            AuthApiError::UserNotFound => (StatusCode::NOT_FOUND, "User not found."),
            AuthApiError::UserAlreadyExists => {
                (StatusCode::CONFLICT, "Email or username already exists.")
            }
            AuthApiError::WeakPassword => (
                StatusCode::BAD_REQUEST,
                "Password must be at least 6 characters.",
            ),
            AuthApiError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::{User, UserRole};

    #[test]
    fn test_user_response_from_user() {
        let user = User {
            id: 7,
            email: "test@example.com".to_string(),
            username: "testuser".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            hashed_password: "hash123".to_string(),
            is_active: true,
            role: UserRole::User,
            phone_number: Some("(111)-111-1111".to_string()),
        };

        let response = UserResponse::from_user(&user);
        assert_eq!(response.id, 7);
        assert_eq!(response.username, "testuser");
        assert_eq!(response.phone_number.as_deref(), Some("(111)-111-1111"));
    }

    #[test]
    fn test_auth_api_error_responses() {
        let invalid_creds = AuthApiError::InvalidCredentials.into_response();
        assert_eq!(invalid_creds.status(), StatusCode::UNAUTHORIZED);

        let denied = AuthApiError::PasswordChangeDenied.into_response();
        assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);

        let not_found = AuthApiError::UserNotFound.into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let conflict = AuthApiError::UserAlreadyExists.into_response();
        assert_eq!(conflict.status(), StatusCode::CONFLICT);

        let weak = AuthApiError::WeakPassword.into_response();
        assert_eq!(weak.status(), StatusCode::BAD_REQUEST);
    }
}
