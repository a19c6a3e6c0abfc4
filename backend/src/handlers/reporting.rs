//! Reporting handlers for the super admin dashboard and data export

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::require_role;
use crate::services::reporting::{RegisterFilter, ReportingService, SystemCounts};
use crate::AppState;
use shared::models::Role;

#[derive(Deserialize)]
pub struct RegisterQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub format: Option<String>, // "json" or "csv"
}

/// Get headline counts for the dashboard
pub async fn system_counts(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Json<SystemCounts>> {
    require_role(&user, &[Role::SuperAdmin])?;
    let service = ReportingService::new(state.db.clone());
    let counts = service.system_counts().await?;
    Ok(Json(counts))
}

/// Get the indent register, as JSON or CSV
pub async fn indent_register(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<RegisterQuery>,
) -> AppResult<impl IntoResponse> {
    require_role(&user, &[Role::SuperAdmin])?;
    let service = ReportingService::new(state.db.clone());

    let filter = RegisterFilter {
        start_date: query.start_date.and_then(|s| s.parse().ok()),
        end_date: query.end_date.and_then(|s| s.parse().ok()),
    };

    let entries = service.indent_register(&filter).await?;

    if query.format.as_deref() == Some("csv") {
        let csv = ReportingService::export_to_csv(&entries)?;
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"indent_register.csv\"",
                ),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(entries).into_response())
    }
}
