use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Caller identity extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to make the operation protected. The
/// user id is the token's `sub` claim, as issued by the identity provider.
pub struct AuthUser {
    pub user_id: String,
}

impl AuthUser {
    /// Returns `Ok(())` if the caller is `owner_id`, `Err(PermissionDenied)` otherwise.
    pub fn require_owner(&self, owner_id: &str) -> Result<(), AppError> {
        if self.user_id == owner_id {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        let claims = jwt::verify(token, &state.config.auth.jwt_secret).map_err(|e| {
            tracing::debug!("Rejected bearer token: {e}");
            AppError::TokenInvalid
        })?;

        if claims.sub.trim().is_empty() {
            return Err(AppError::TokenInvalid);
        }

        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}
