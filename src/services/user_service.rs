//! Account registration and credential login.

use sqlx::PgPool;
use tracing::{info, warn};

use crate::auth::{self, Role};
use crate::config::Config;
use crate::crypto;
use crate::errors::CatalogError;
use crate::models::{LoginForm, RegisterRequest, TokenResponse, User};
use crate::repositories::users;

/// Register a new account.
///
/// Every self-registered account gets the `user` role; any role supplied
/// by the caller is ignored.
///
/// # Errors
///
/// - `CatalogError::Validation` if the email or password is malformed
/// - `CatalogError::Conflict` if the email is already registered
pub async fn register(pool: &PgPool, request: &RegisterRequest) -> Result<User, CatalogError> {
    request.validate()?;

    let password_hash = crypto::hash_password(&request.password).map_err(|e| {
        warn!(target: "catalog.services.user", error = %e, "Password hashing failed");
        CatalogError::Internal
    })?;

    let user = users::create_user(pool, &request.email, &password_hash, Role::User).await?;

    info!(target: "catalog.services.user", user_id = user.id, "Registered new account");
    Ok(user)
}

/// Authenticate with email and password and issue an access token.
///
/// The form's `username` field carries the email address. A missing
/// account and a wrong password are indistinguishable to the caller.
///
/// # Errors
///
/// Returns `CatalogError::InvalidCredentials` when authentication fails.
pub async fn login(
    pool: &PgPool,
    config: &Config,
    form: &LoginForm,
) -> Result<TokenResponse, CatalogError> {
    let user = users::get_by_email(pool, &form.username)
        .await?
        .ok_or(CatalogError::InvalidCredentials)?;

    let matches = crypto::verify_password(&form.password, &user.password_hash).map_err(|e| {
        warn!(target: "catalog.services.user", error = %e, "Password verification failed");
        CatalogError::Internal
    })?;

    if !matches {
        warn!(target: "catalog.services.user", user_id = user.id, "Login rejected: bad password");
        return Err(CatalogError::InvalidCredentials);
    }

    let role = user
        .role
        .parse::<Role>()
        .map_err(|_| CatalogError::Internal)?;

    let access_token = auth::issue_token(
        &config.jwt_secret,
        user.id,
        role,
        None,
        config.token_ttl_minutes,
    )?;

    info!(target: "catalog.services.user", user_id = user.id, "Issued access token");
    Ok(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    })
}
