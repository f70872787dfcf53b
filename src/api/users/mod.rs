//! User API endpoints

pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};

use super::state::AppState;

pub use handlers::{
    DeleteUserResponse, RegisterUserApiRequest, UpdateUserApiRequest, UserResponse,
};

/// Create the user router, mounted under `/api/users`
pub fn create_users_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register_user))
        .route("/by-username/{username}", get(handlers::get_user_by_username))
        .route(
            "/{id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
}
