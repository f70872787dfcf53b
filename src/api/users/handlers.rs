//! User registration and management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{User, UserId};
use crate::infrastructure::user::{CreateUserRequest, UpdateUserRequest};

/// Registration payload. Absent fields are treated as empty and fail validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUserApiRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request to update a user
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserApiRequest {
    pub username: String,
    pub email: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Public view of a user record. The password hash is never exposed.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().value(),
            username: user.username().to_string(),
            email: user.email().to_string(),
            active: user.is_active(),
            created_at: user.created_at().to_rfc3339(),
            updated_at: user.updated_at().to_rfc3339(),
        }
    }
}

/// Delete confirmation
#[derive(Debug, Clone, Serialize)]
pub struct DeleteUserResponse {
    pub message: String,
    pub id: i64,
}

/// POST /api/users/register
pub async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterUserApiRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    debug!(username = %request.username, "Registering user");

    let user = state
        .user_service
        .register(CreateUserRequest {
            username: request.username,
            email: request.email,
            password: request.password,
        })
        .await
        .map_err(|e| ApiError::from_user_error(e, StatusCode::BAD_REQUEST))?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!(user_id = id, "Getting user");

    let user = state
        .user_service
        .get_by_id(UserId::new(id))
        .await
        .map_err(|e| ApiError::from_user_error(e, StatusCode::NOT_FOUND))?;

    Ok(Json(UserResponse::from(&user)))
}

/// GET /api/users/by-username/{username}
pub async fn get_user_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!(username = %username, "Getting user by username");

    let user = state
        .user_service
        .get_by_username(&username)
        .await
        .map_err(|e| ApiError::from_user_error(e, StatusCode::NOT_FOUND))?;

    Ok(Json(UserResponse::from(&user)))
}

/// PUT /api/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserApiRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!(user_id = id, "Updating user");

    let user = state
        .user_service
        .update(
            UserId::new(id),
            UpdateUserRequest {
                username: request.username,
                email: request.email,
                active: request.active,
            },
        )
        .await
        .map_err(|e| ApiError::from_user_error(e, StatusCode::BAD_REQUEST))?;

    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteUserResponse>, ApiError> {
    debug!(user_id = id, "Deleting user");

    state
        .user_service
        .delete(UserId::new(id))
        .await
        .map_err(|e| ApiError::from_user_error(e, StatusCode::NOT_FOUND))?;

    Ok(Json(DeleteUserResponse {
        message: "User deleted successfully".to_string(),
        id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::NewUser;

    #[test]
    fn test_register_request_missing_fields_default_to_empty() {
        let json = r#"{"username": "alice"}"#;
        let request: RegisterUserApiRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.username, "alice");
        assert!(request.email.is_empty());
        assert!(request.password.is_empty());
    }

    #[test]
    fn test_update_request_active_defaults_to_true() {
        let json = r#"{"username": "alice", "email": "alice@example.com"}"#;
        let request: UpdateUserApiRequest = serde_json::from_str(json).unwrap();

        assert!(request.active);
    }

    #[test]
    fn test_update_request_requires_email() {
        let json = r#"{"username": "alice"}"#;
        assert!(serde_json::from_str::<UpdateUserApiRequest>(json).is_err());
    }

    #[test]
    fn test_user_response_hides_password_hash() {
        let user = User::from_new(
            UserId::new(7),
            NewUser {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                password_hash: "{encoded}123".to_string(),
            },
        );

        let response = UserResponse::from(&user);
        let json = serde_json::to_string(&response).unwrap();

        assert_eq!(response.id, 7);
        assert!(response.active);
        assert!(!json.contains("password"));
        assert!(!json.contains("{encoded}"));
    }
}
