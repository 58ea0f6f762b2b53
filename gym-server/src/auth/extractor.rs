//! JWT Extractor
//!
//! Lets handlers take `CurrentUser` directly as an argument.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::AppError;
use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Already validated by require_auth
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let token = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(JwtService::extract_from_header)
            .ok_or_else(AppError::not_authenticated)?;

        let user = state
            .get_jwt_service()
            .validate_token(token)
            .and_then(CurrentUser::try_from)
            .map_err(|e| AppError::invalid_token(e.to_string()))?;

        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
