// src/handlers/movements.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermRegisterMovements, PermViewMovements, RequirePermission},
    },
    models::inventory::{Movement, MovementType},
};

fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("A quantidade deve ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payload: RegisterMovement
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterMovementPayload {
    pub product_id: Uuid,

    #[serde(rename = "type")]
    pub movement_type: MovementType,

    #[validate(custom(function = "validate_positive"))]
    pub quantity: Decimal,
}

#[utoipa::path(
    post,
    path = "/api/movements",
    tag = "Movements",
    security(("api_jwt" = [])),
    request_body = RegisterMovementPayload,
    responses(
        (status = 201, description = "Movimentação registrada", body = Movement),
        (status = 404, description = "Produto não encontrado"),
        (status = 409, description = "Estoque insuficiente para a saída"),
    )
)]
pub async fn register_movement(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequirePermission<PermRegisterMovements>,
    Json(payload): Json<RegisterMovementPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let movement = app_state
        .inventory_service
        .register_movement(
            payload.product_id,
            payload.movement_type,
            payload.quantity,
            &user,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(movement)))
}

#[utoipa::path(
    get,
    path = "/api/movements",
    tag = "Movements",
    security(("api_jwt" = [])),
    responses((status = 200, description = "100 movimentações mais recentes", body = [Movement]))
)]
pub async fn list_movements(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermViewMovements>,
) -> Result<impl IntoResponse, AppError> {
    let movements = app_state.inventory_service.list_recent_movements().await?;
    Ok((StatusCode::OK, Json(movements)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantidade_zero_ou_negativa_e_recusada() {
        assert!(validate_positive(&Decimal::ZERO).is_err());
        assert!(validate_positive(&Decimal::from(-3)).is_err());
        assert!(validate_positive(&Decimal::ONE).is_ok());
    }
}
