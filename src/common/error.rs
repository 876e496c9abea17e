use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;

use crate::models::auth::Permission;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Toda violação de regra de negócio tem uma variante própria: nada de
// falhar em silêncio como fazia o app original.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("PIN inválido")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Produto não encontrado")]
    ProductNotFound,

    #[error("Permissão necessária: {0}")]
    PermissionDenied(Permission),

    // Exigência de papel, não de permissão: um OPERATOR com todas as
    // permissões concedidas continua barrado.
    #[error("Apenas ADMIN pode realizar esta ação")]
    AdminRoleRequired,

    #[error("Estoque insuficiente: disponível {available}, solicitado {requested}")]
    InsufficientStock {
        available: Decimal,
        requested: Decimal,
    },

    #[error("Usuário não pode excluir a si mesmo")]
    SelfDeletionRejected,

    #[error("Frase de confirmação incorreta")]
    ReseedNotConfirmed,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::ReseedNotConfirmed => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::PermissionDenied(_) | AppError::AdminRoleRequired => StatusCode::FORBIDDEN,
            AppError::UserNotFound | AppError::ProductNotFound => StatusCode::NOT_FOUND,
            AppError::InsufficientStock { .. } => StatusCode::CONFLICT,
            AppError::SelfDeletionRejected => StatusCode::CONFLICT,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }))
            }
            AppError::InvalidCredentials => Json(json!({ "error": "PIN incorreto." })),
            AppError::InvalidToken => {
                Json(json!({ "error": "Token de autenticação inválido ou ausente." }))
            }
            AppError::UserNotFound => Json(json!({ "error": "Usuário não encontrado." })),
            AppError::ProductNotFound => Json(json!({ "error": "Produto não encontrado." })),
            AppError::PermissionDenied(permission) => {
                tracing::warn!("Acesso negado: faltava a permissão '{}'", permission);
                Json(json!({
                    "error": format!(
                        "Você precisa da permissão '{}' para realizar esta ação.",
                        permission
                    ),
                }))
            }
            AppError::AdminRoleRequired => {
                Json(json!({ "error": "Apenas o ADMIN pode realizar esta ação." }))
            }
            AppError::InsufficientStock {
                available,
                requested,
            } => Json(json!({
                "error": "Estoque insuficiente!",
                "available": available,
                "requested": requested,
            })),
            AppError::SelfDeletionRejected => {
                Json(json!({ "error": "Não pode excluir a si mesmo." }))
            }
            AppError::ReseedNotConfirmed => Json(json!({
                "error": "Confirmação incorreta. Envie a frase exata para limpar o estoque.",
            })),

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                Json(json!({ "error": "Ocorreu um erro inesperado." }))
            }
        };

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn regras_de_negocio_tem_status_proprio() {
        let err = AppError::InsufficientStock {
            available: Decimal::from(3),
            requested: Decimal::from(5),
        };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::SelfDeletionRejected.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::PermissionDenied(Permission::ManageUsers).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::AdminRoleRequired.status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn nao_encontrado_vira_404() {
        assert_eq!(AppError::ProductNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::UserNotFound.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn falhas_de_autenticacao_viram_401() {
        assert_eq!(
            AppError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
    }
}
