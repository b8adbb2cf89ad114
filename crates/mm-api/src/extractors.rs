//! Axum extractors for API handlers

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use mm_core::config::AppConfig;
use mm_models::{Role, User};
use mm_queries::RawQuery;
use mm_services::ServiceContext;

use crate::error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub services: ServiceContext,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(services: ServiceContext, config: AppConfig) -> Self {
        Self {
            services,
            config: Arc::new(config),
        }
    }
}

/// The user named by the identity header.
///
/// The header is set by the authenticating gateway in front of the API;
/// requests without it, or naming an unknown or deactivated user, are
/// rejected with 401.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    /// Require one of `roles`
    pub fn restrict_to(&self, roles: &[Role]) -> Result<(), ApiError> {
        if roles.contains(&self.0.role) {
            Ok(())
        } else {
            Err(ApiError::forbidden(
                "You do not have permission to perform this action",
            ))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let not_logged_in =
            || ApiError::unauthorized("You are not logged in! Please log in to get access.");

        let user_id = parts
            .headers
            .get(app_state.config.auth.identity_header.as_str())
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(not_logged_in)?;

        let user = app_state
            .services
            .users
            .find_active(user_id)
            .await?
            .ok_or_else(not_logged_in)?;

        Ok(AuthenticatedUser(user))
    }
}

impl std::ops::Deref for AuthenticatedUser {
    type Target = User;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// The raw query string of a list request
#[derive(Debug, Clone)]
pub struct ListQuery(pub RawQuery);

#[async_trait]
impl<S> FromRequestParts<S> for ListQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = RawQuery::parse(parts.uri.query().unwrap_or(""))?;
        Ok(ListQuery(raw))
    }
}
