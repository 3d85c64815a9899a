//! Authenticated-user extractors
//!
//! Handlers take [`CurrentUser`] to require a valid bearer token and
//! [`AdminUser`] to additionally require the admin role.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

use greencart::{Role, User};

use super::TokenError;
use crate::{error::ApiError, AppState};

/// The active user a request's bearer token belongs to
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    /// Fail with `FORBIDDEN` unless the user has one of `roles`
    pub fn require_role(&self, roles: &[Role]) -> Result<(), ApiError> {
        if roles.contains(&self.0.role) {
            Ok(())
        } else {
            Err(ApiError::forbidden(
                "FORBIDDEN",
                format!(
                    "User role '{}' is not authorized to access this route",
                    self.0.role
                ),
            ))
        }
    }
}

/// Token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized("NO_TOKEN", "No token provided"))?;

        let claims = state.jwt.verify(token).map_err(|e| {
            tracing::debug!("Token verification failed: {}", e);
            match e {
                TokenError::Expired => ApiError::unauthorized("TOKEN_EXPIRED", "Token expired"),
                _ => ApiError::unauthorized("INVALID_TOKEN", "Invalid token"),
            }
        })?;

        let user = state
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| ApiError::unauthorized("USER_NOT_FOUND", "User not found"))?;

        if !user.is_active {
            tracing::warn!(target: "greencart::security", user_id = %user.id, "Deactivated account used a valid token");
            return Err(ApiError::forbidden(
                "ACCOUNT_DEACTIVATED",
                "Account has been deactivated",
            ));
        }

        Ok(CurrentUser(user))
    }
}

/// A [`CurrentUser`] holding the admin role
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

#[axum::async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let current = CurrentUser::from_request_parts(parts, state).await?;
        current.require_role(&[Role::Admin])?;
        Ok(AdminUser(current.0))
    }
}
