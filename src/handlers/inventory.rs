// src/handlers/inventory.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{PermEditInventory, PermViewInventory, RequirePermission},
    models::inventory::{Product, UnitType},
};

// ---
// Validação customizada
// ---
pub(crate) fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payload: CreateProduct
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    pub unit: UnitType,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)] // Se o JSON não tiver esse campo, assume 0
    pub quantity: Decimal,

    // Sem esse campo, o mínimo é derivado do tipo de unidade.
    pub min_stock: Option<Decimal>,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub unit_price: Decimal,
}

impl CreateProductPayload {
    fn validate_consistency(&self) -> Result<(), ValidationError> {
        if let Some(min_stock) = self.min_stock {
            if min_stock.is_sign_negative() {
                return Err(ValidationError::new("MinStockNegative"));
            }
        }
        Ok(())
    }
}

#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Inventory",
    security(("api_jwt" = [])),
    responses((status = 200, description = "Catálogo completo", body = [Product]))
)]
pub async fn get_all_products(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermViewInventory>,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state.inventory_service.get_all_products().await?;
    Ok((StatusCode::OK, Json(products)))
}

#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Inventory",
    security(("api_jwt" = [])),
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Produto criado", body = Product),
        (status = 403, description = "Sem a permissão 'edit_inventory'"),
    )
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermEditInventory>,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    payload.validate_consistency().map_err(|e| {
        let mut errors = validator::ValidationErrors::new();
        errors.add("minStock", e);
        AppError::ValidationError(errors)
    })?;

    let product = app_state
        .inventory_service
        .create_product(
            &payload.name,
            payload.unit,
            payload.quantity,
            payload.min_stock,
            payload.unit_price,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

// ---
// Payload: UpdateProduct (parcial)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(length(min = 1, message = "O nome não pode ficar vazio."))]
    pub name: Option<String>,
    pub unit: Option<UnitType>,
    pub quantity: Option<Decimal>,
    pub min_stock: Option<Decimal>,
    pub unit_price: Option<Decimal>,
}

impl UpdateProductPayload {
    fn validate_consistency(&self) -> Result<(), ValidationError> {
        for value in [self.quantity, self.min_stock, self.unit_price]
            .into_iter()
            .flatten()
        {
            if value.is_sign_negative() {
                let mut err = ValidationError::new("range");
                err.message = Some("O valor não pode ser negativo.".into());
                return Err(err);
            }
        }
        Ok(())
    }
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Inventory",
    security(("api_jwt" = [])),
    request_body = UpdateProductPayload,
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto atualizado", body = Product),
        (status = 404, description = "Produto não encontrado"),
    )
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermEditInventory>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    payload.validate_consistency().map_err(|e| {
        let mut errors = validator::ValidationErrors::new();
        errors.add("quantity", e);
        AppError::ValidationError(errors)
    })?;

    let product = app_state
        .inventory_service
        .update_product(
            id,
            payload.name.as_deref(),
            payload.unit,
            payload.quantity,
            payload.min_stock,
            payload.unit_price,
        )
        .await?;

    Ok((StatusCode::OK, Json(product)))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Inventory",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 204, description = "Produto excluído"),
        (status = 404, description = "Produto não encontrado"),
    )
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermEditInventory>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.inventory_service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valores_negativos_sao_recusados() {
        assert!(validate_not_negative(&Decimal::from(-1)).is_err());
        assert!(validate_not_negative(&Decimal::ZERO).is_ok());
        assert!(validate_not_negative(&Decimal::from(10)).is_ok());
    }
}
