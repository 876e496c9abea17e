// src/services/auth_service.rs

use bcrypt::verify;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, User},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String) -> Self {
        Self { user_repo, jwt_secret }
    }

    /// Login por PIN: compara o PIN informado com o hash de cada usuário
    /// cadastrado até achar o dono. A verificação bcrypt é pesada, então
    /// a varredura inteira roda fora do executor async.
    pub async fn login(&self, pin: &str) -> Result<(String, User), AppError> {
        let users = self.user_repo.list_all().await?;

        let pin_clone = pin.to_owned();
        let matched = tokio::task::spawn_blocking(move || -> Result<Option<User>, bcrypt::BcryptError> {
            for user in users {
                if verify(&pin_clone, &user.pin_hash)? {
                    return Ok(Some(user));
                }
            }
            Ok(None)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de PIN: {}", e))??;

        let user = matched.ok_or(AppError::InvalidCredentials)?;

        let token = self.create_token(user.id)?;
        tracing::info!("Login bem-sucedido: {} ({:?})", user.name, user.role);
        Ok((token, user))
    }

    /// Valida o token e recarrega o usuário do banco: alterações de
    /// permissão feitas pelo gestor valem já na requisição seguinte.
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
