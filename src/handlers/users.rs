// src/handlers/users.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermManageUsers, RequirePermission},
    },
    models::auth::{validate_pin, Permission, PermissionEntry, Role, User, ALL_PERMISSIONS},
};

// ---
// Payload: CreateUser
// Campos ausentes recebem os padrões do app: papel OPERATOR, PIN "0000"
// e lista de permissões vazia.
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    pub name: Option<String>,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    #[validate(custom(function = "validate_pin"))]
    pub pin: Option<String>,

    pub role: Option<Role>,
    pub permissions: Option<Vec<Permission>>,
}

// ---
// Payload: UpdateUser (parcial)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPayload {
    pub name: Option<String>,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    #[validate(custom(function = "validate_pin"))]
    pub pin: Option<String>,

    pub role: Option<Role>,
    pub permissions: Option<Vec<Permission>>,
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    security(("api_jwt" = [])),
    responses((status = 200, description = "Todos os usuários", body = [User]))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermManageUsers>,
) -> Result<impl IntoResponse, AppError> {
    let users = app_state.user_service.list_users().await?;
    Ok((StatusCode::OK, Json(users)))
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    security(("api_jwt" = [])),
    request_body = CreateUserPayload,
    responses((status = 201, description = "Usuário criado", body = User))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermManageUsers>,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let user = app_state
        .user_service
        .create_user(
            payload.name.as_deref(),
            payload.email.as_deref(),
            payload.pin.as_deref(),
            payload.role,
            payload.permissions,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    security(("api_jwt" = [])),
    request_body = UpdateUserPayload,
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário atualizado", body = User),
        (status = 404, description = "Usuário não encontrado"),
    )
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermManageUsers>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let user = app_state
        .user_service
        .update_user(
            id,
            payload.name.as_deref(),
            payload.email.as_deref(),
            payload.pin.as_deref(),
            payload.role,
            payload.permissions,
        )
        .await?;

    Ok((StatusCode::OK, Json(user)))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 204, description = "Usuário excluído"),
        (status = 404, description = "Usuário não encontrado"),
        (status = 409, description = "Tentativa de autoexclusão"),
    )
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    AuthenticatedUser(acting_user): AuthenticatedUser,
    _guard: RequirePermission<PermManageUsers>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.user_service.delete_user(id, &acting_user).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Catálogo fixo de permissões com os rótulos da tela de gestão.
#[utoipa::path(
    get,
    path = "/api/permissions",
    tag = "Users",
    security(("api_jwt" = [])),
    responses((status = 200, description = "Permissões disponíveis", body = [PermissionEntry]))
)]
pub async fn list_permissions(
    AuthenticatedUser(_user): AuthenticatedUser,
) -> impl IntoResponse {
    let entries: Vec<PermissionEntry> = ALL_PERMISSIONS
        .iter()
        .map(|p| PermissionEntry {
            id: *p,
            label: p.label(),
        })
        .collect();
    (StatusCode::OK, Json(entries))
}
