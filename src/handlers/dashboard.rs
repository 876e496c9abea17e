// src/handlers/dashboard.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermViewDashboard, RequirePermission},
    },
    models::auth::Permission,
    models::dashboard::DashboardSummary,
};

#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    security(("api_jwt" = [])),
    responses((status = 200, description = "Resumo do estoque", body = DashboardSummary))
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequirePermission<PermViewDashboard>,
) -> Result<impl IntoResponse, AppError> {
    // O valor patrimonial só aparece para quem pode ver financeiro.
    let include_financials = user.has_permission(Permission::ViewFinancials);

    let summary = app_state
        .dashboard_service
        .get_summary(include_financials)
        .await?;

    Ok((StatusCode::OK, Json(summary)))
}
