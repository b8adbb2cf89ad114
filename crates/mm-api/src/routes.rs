//! API routes

use axum::{
    http::Uri,
    routing::{get, patch, post},
    Router,
};

use crate::error::ApiError;
use crate::extractors::AppState;
use crate::handlers::{mentors, sessions, users};

/// Create the complete API router
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", api_v1_router())
        .fallback(not_found)
}

fn api_v1_router() -> Router<AppState> {
    Router::new()
        .nest("/users", users_router())
        .nest("/mentors", mentors_router())
        .nest("/sessions", sessions_router())
}

fn users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route("/me", get(users::get_me))
        .route("/updateMe", patch(users::update_me))
        .route("/updateMe/photo", patch(users::update_my_photo))
        .route("/deleteMe", axum::routing::delete(users::delete_me))
        .route(
            "/:id",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
}

fn mentors_router() -> Router<AppState> {
    Router::new()
        .route("/", get(mentors::list_mentors))
        .route("/:id", get(mentors::get_mentor))
        .route("/:mentorId/sessions", post(sessions::request_session))
}

fn sessions_router() -> Router<AppState> {
    Router::new()
        .route("/", get(sessions::list_sessions))
        .route("/mine", get(sessions::my_sessions))
        .route("/:sessionId/respond", patch(sessions::respond_to_session))
        .route("/:sessionId/cancel", patch(sessions::cancel_session))
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("Can't find {} on this server!", uri))
}
