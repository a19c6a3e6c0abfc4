//! Authentication handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::models::User;
use crate::services::AuthService;
use crate::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let tokens = auth_service.login(&body.email, &body.password).await?;

    Ok(Json(LoginResponse {
        access_token: tokens.access_token,
        token_type: tokens.token_type,
        expires_in: tokens.expires_in,
    }))
}

/// Current user profile handler
pub async fn me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<User>, AppError> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let profile = auth_service.get_user(user.user_id).await?;
    Ok(Json(profile))
}
