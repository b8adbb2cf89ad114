//! Sessions API handlers

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use mm_models::Role;
use mm_services::{
    AllSessionsService, CancelSessionService, MySessionsService, RequestSessionService,
    RespondSessionService, SessionRequest, SessionResponse,
};

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser, ListQuery};
use crate::response::Envelope;

/// POST /api/v1/mentors/:mentorId/sessions
///
/// The body is optional; without one the session has no topic or date.
pub async fn request_session(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(mentor_id): Path<String>,
    body: Option<Json<SessionRequest>>,
) -> ApiResult<impl IntoResponse> {
    user.restrict_to(&[Role::Mentee])?;
    let params = body.map(|Json(params)| params).unwrap_or_default();
    let session = RequestSessionService::new(&state.services, &user)
        .call(&mentor_id, params)
        .await?;
    Ok(Envelope::one("session", &session))
}

/// GET /api/v1/sessions
pub async fn list_sessions(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ListQuery(raw): ListQuery,
) -> ApiResult<impl IntoResponse> {
    user.restrict_to(&[Role::Admin])?;
    let sessions = AllSessionsService::new(&state.services).call(raw).await?;
    Ok(Envelope::list("sessions", sessions))
}

/// GET /api/v1/sessions/mine
pub async fn my_sessions(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ListQuery(raw): ListQuery,
) -> ApiResult<impl IntoResponse> {
    let sessions = MySessionsService::new(&state.services, &user).call(raw).await?;
    Ok(Envelope::list("sessions", sessions))
}

/// PATCH /api/v1/sessions/:sessionId/respond
pub async fn respond_to_session(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(session_id): Path<String>,
    body: Option<Json<SessionResponse>>,
) -> ApiResult<impl IntoResponse> {
    user.restrict_to(&[Role::Mentor])?;
    let response = body.map(|Json(response)| response).unwrap_or_default();
    let session = RespondSessionService::new(&state.services, &user)
        .call(&session_id, response)
        .await?;
    Ok(Envelope::one("session", &session))
}

/// PATCH /api/v1/sessions/:sessionId/cancel
pub async fn cancel_session(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(session_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let session = CancelSessionService::new(&state.services, &user)
        .call(&session_id)
        .await?;
    Ok(Envelope::one("session", &session))
}
