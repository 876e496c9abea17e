// src/handlers/admin.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    common::error::AppError, config::AppState, middleware::auth::AuthenticatedUser,
    models::auth::{Role, User},
};

/// Frase exata exigida para a limpeza manual do catálogo. Substitui o
/// "tem certeza?" interativo do app original.
pub const RESEED_CONFIRMATION: &str = "APAGAR ESTOQUE";

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReseedPayload {
    #[schema(example = "APAGAR ESTOQUE")]
    pub confirm: String,
}

/// A limpeza do banco exige o PAPEL de ADMIN, não uma permissão: um
/// OPERATOR com todas as permissões concedidas continua barrado.
fn ensure_admin(user: &User) -> Result<(), AppError> {
    if user.role != Role::Admin {
        return Err(AppError::AdminRoleRequired);
    }
    Ok(())
}

// Limpa e replanta o catálogo canônico sob demanda. Só ADMIN, e só com a
// frase de confirmação correta: a operação destrói edições manuais.
#[utoipa::path(
    post,
    path = "/api/admin/reseed",
    tag = "Admin",
    security(("api_jwt" = [])),
    request_body = ReseedPayload,
    responses(
        (status = 200, description = "Catálogo limpo e ressemeado"),
        (status = 400, description = "Frase de confirmação incorreta"),
        (status = 403, description = "Apenas ADMIN pode limpar o banco"),
    )
)]
pub async fn force_reseed(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<ReseedPayload>,
) -> Result<impl IntoResponse, AppError> {
    ensure_admin(&user)?;

    if payload.confirm != RESEED_CONFIRMATION {
        return Err(AppError::ReseedNotConfirmed);
    }

    tracing::warn!("Limpeza manual do catálogo solicitada por {}", user.name);
    app_state.seed_service.reseed_catalog().await?;

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::ALL_PERMISSIONS;
    use chrono::Utc;
    use uuid::Uuid;

    fn usuario(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Teste".into(),
            email: "teste@lagoon.com".into(),
            pin_hash: "$2b$12$hash".into(),
            role,
            permissions: ALL_PERMISSIONS.to_vec(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn operador_com_todas_as_permissoes_nao_limpa_o_banco() {
        // O papel decide, não a lista de permissões.
        let operador = usuario(Role::Operator);
        match ensure_admin(&operador) {
            Err(AppError::AdminRoleRequired) => {}
            other => panic!("esperava AdminRoleRequired, veio {:?}", other),
        }
    }

    #[test]
    fn admin_passa_pela_guarda_de_papel() {
        let admin = usuario(Role::Admin);
        assert!(ensure_admin(&admin).is_ok());
    }
}
