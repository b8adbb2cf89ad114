//! Users API handlers

use axum::{
    extract::{Multipart, Path, State},
    response::IntoResponse,
    Json,
};
use mm_db::JsonDocument;
use mm_models::Role;
use mm_photos::PhotoUpload;
use mm_services::{AdminUserService, DeactivateMeService, UpdateMeService, UpdatePhotoService};

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, AuthenticatedUser, ListQuery};
use crate::response::{no_content, Envelope};

/// Multipart field carrying the photo
const PHOTO_FIELD: &str = "photo";

/// GET /api/v1/users
pub async fn list_users(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ListQuery(raw): ListQuery,
) -> ApiResult<impl IntoResponse> {
    user.restrict_to(&[Role::Admin])?;
    let users = AdminUserService::new(&state.services).list(raw).await?;
    Ok(Envelope::list("users", users))
}

/// POST /api/v1/users
///
/// Accounts are created by the sign-up flow, never here.
pub async fn create_user() -> ApiError {
    ApiError::internal("this route is not defined, please use /signup instead")
}

/// GET /api/v1/users/me
pub async fn get_me(user: AuthenticatedUser) -> impl IntoResponse {
    Envelope::one("user", &user.0)
}

/// PATCH /api/v1/users/updateMe
pub async fn update_me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<JsonDocument>,
) -> ApiResult<impl IntoResponse> {
    let updated = UpdateMeService::new(&state.services, &user).call(body).await?;
    Ok(Envelope::one("user", &updated))
}

/// PATCH /api/v1/users/updateMe/photo
pub async fn update_my_photo(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(PHOTO_FIELD) {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let data = field.bytes().await?;
        upload = Some(PhotoUpload::new(content_type, file_name, data));
        break;
    }

    let upload = upload.ok_or_else(|| ApiError::bad_request("Please upload a photo"))?;
    let updated = UpdatePhotoService::new(&state.services, &user).call(upload).await?;
    Ok(Envelope::one("user", &updated))
}

/// DELETE /api/v1/users/deleteMe
pub async fn delete_me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    DeactivateMeService::new(&state.services, &user).call().await?;
    Ok(no_content())
}

/// GET /api/v1/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let found = AdminUserService::new(&state.services).get(&id).await?;
    Ok(Envelope::one("user", &found))
}

/// PATCH /api/v1/users/:id
pub async fn update_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(body): Json<JsonDocument>,
) -> ApiResult<impl IntoResponse> {
    user.restrict_to(&[Role::Admin])?;
    let updated = AdminUserService::new(&state.services).update(&id, body).await?;
    Ok(Envelope::one("user", &updated))
}

/// DELETE /api/v1/users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    user.restrict_to(&[Role::Admin])?;
    AdminUserService::new(&state.services).delete(&id).await?;
    Ok(no_content())
}
