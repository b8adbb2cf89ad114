//! Mentors API handlers

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use mm_services::MentorDirectory;

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser, ListQuery};
use crate::response::Envelope;

/// GET /api/v1/mentors
pub async fn list_mentors(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    ListQuery(raw): ListQuery,
) -> ApiResult<impl IntoResponse> {
    let mentors = MentorDirectory::new(&state.services).list(raw).await?;
    Ok(Envelope::list("mentors", mentors))
}

/// GET /api/v1/mentors/:id
pub async fn get_mentor(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let mentor = MentorDirectory::new(&state.services).get(&id).await?;
    Ok(Envelope::one("mentor", &mentor))
}
