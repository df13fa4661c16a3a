//! Registration and login endpoints.

use axum::{extract::State, http::StatusCode, Form, Json};

use crate::errors::CatalogError;
use crate::handlers::AppState;
use crate::models::{LoginForm, RegisterRequest, TokenResponse, UserResponse};
use crate::services::user_service;

/// Handle account registration.
///
/// POST /api/v1/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), CatalogError> {
    let user = user_service::register(&state.pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Handle credential login (OAuth2 password form; `username` is the email).
///
/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Form(payload): Form<LoginForm>,
) -> Result<Json<TokenResponse>, CatalogError> {
    let token = user_service::login(&state.pool, &state.config, &payload).await?;
    Ok(Json(token))
}
