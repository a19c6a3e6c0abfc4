//! HTTP handlers for super admin user management

use axum::{extract::State, http::StatusCode, Json};

use crate::error::AppResult;
use crate::middleware::{require_role, CurrentUser};
use crate::models::{Role, User};
use crate::services::auth::CreateUserInput;
use crate::services::AuthService;
use crate::AppState;

/// Create a user account with an assigned role
pub async fn create_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<CreateUserInput>,
) -> AppResult<(StatusCode, Json<User>)> {
    require_role(&user, &[Role::SuperAdmin])?;
    let service = AuthService::new(state.db.clone(), &state.config);
    let created = service.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
