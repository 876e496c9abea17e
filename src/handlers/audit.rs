// src/handlers/audit.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::inventory::validate_not_negative,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermViewAudit, RequirePermission},
    },
    models::auth::Permission,
    models::inventory::{Movement, Product},
};

// ---
// Payload: contagem física de um produto
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditCountPayload {
    pub product_id: Uuid,

    #[validate(custom(function = "validate_not_negative"))]
    pub counted_quantity: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditCountResponse {
    pub product: Product,

    // None quando a contagem bateu com o sistema.
    pub movement: Option<Movement>,
}

#[utoipa::path(
    post,
    path = "/api/audit/count",
    tag = "Audit",
    security(("api_jwt" = [])),
    request_body = AuditCountPayload,
    responses(
        (status = 200, description = "Contagem reconciliada", body = AuditCountResponse),
        (status = 404, description = "Produto não encontrado"),
    )
)]
pub async fn register_count(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequirePermission<PermViewAudit>,
    Json(payload): Json<AuditCountPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    // A averiguação grava no mesmo livro-razão das movimentações comuns,
    // então quem conta também precisa poder registrá-las.
    if !user.has_permission(Permission::RegisterMovements) {
        return Err(AppError::PermissionDenied(Permission::RegisterMovements));
    }

    let (product, movement) = app_state
        .inventory_service
        .register_audit_count(payload.product_id, payload.counted_quantity, &user)
        .await?;

    Ok((StatusCode::OK, Json(AuditCountResponse { product, movement })))
}
