//! Authentication middleware for protected routes.
//!
//! Extracts the Bearer token from the Authorization header, validates the
//! JWT, confirms the subject still exists, and injects an [`Identity`] into
//! request extensions for downstream handlers.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::IntoResponse,
};
use tracing::instrument;

use crate::auth::{self, Identity, Role, TokenError};
use crate::errors::CatalogError;
use crate::handlers::AppState;
use crate::repositories::users;

/// Extract the Bearer token from the Authorization header.
fn extract_bearer_token(req: &Request) -> Result<&str, CatalogError> {
    let auth_header = req
        .headers()
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::debug!(target: "catalog.middleware.auth", "Missing Authorization header");
            CatalogError::Unauthenticated("Missing Authorization header".to_string())
        })?;

    auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::debug!(target: "catalog.middleware.auth", "Invalid Authorization header format");
        CatalogError::Unauthenticated("Invalid Authorization header format".to_string())
    })
}

/// Authentication middleware for user tokens.
///
/// # Response
///
/// - 401 Unauthorized if the token is missing, malformed, or expired
/// - 404 Not Found if the token subject no longer exists
/// - Continues with an [`Identity`] in extensions otherwise
#[instrument(skip_all, name = "catalog.middleware.auth")]
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, CatalogError> {
    let token = extract_bearer_token(&req)?;

    let claims = auth::validate_token(&state.config.jwt_secret, token).map_err(|e| match e {
        TokenError::Expired => CatalogError::Unauthenticated("Token has expired".to_string()),
        TokenError::Invalid(_) => {
            CatalogError::Unauthenticated("Could not validate credentials".to_string())
        }
    })?;

    let user_id: i64 = claims.sub.parse().map_err(|_| {
        tracing::debug!(target: "catalog.middleware.auth", "Token subject is not a user id");
        CatalogError::Unauthenticated("Could not validate credentials".to_string())
    })?;

    // Tokens can outlive their accounts; re-check the subject every request.
    let user = users::get_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| CatalogError::NotFound("User not found".to_string()))?;

    let role: Role = user
        .role
        .parse()
        .map_err(|_| CatalogError::Internal)?;

    req.extensions_mut().insert(Identity {
        id: user.id,
        role,
    });

    Ok(next.run(req).await)
}
