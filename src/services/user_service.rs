// src/services/user_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Permission, Role, User},
};

/// PIN atribuído a usuários criados sem PIN explícito. O gestor deve
/// trocá-lo na sequência.
const DEFAULT_PIN: &str = "0000";

/// Guarda de autoexclusão: excluir o próprio usuário derrubaria a sessão
/// de quem está operando, então a exclusão é recusada antes de qualquer
/// escrita no banco.
fn ensure_not_self(target_id: Uuid, acting_user: &User) -> Result<(), AppError> {
    if target_id == acting_user.id {
        return Err(AppError::SelfDeletionRejected);
    }
    Ok(())
}

#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    pool: PgPool,
}

impl UserService {
    pub fn new(user_repo: UserRepository, pool: PgPool) -> Self {
        Self { user_repo, pool }
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.user_repo.list_all().await
    }

    /// Cria um usuário aplicando os padrões do app para campos ausentes:
    /// papel OPERATOR, PIN "0000" e nenhuma permissão.
    pub async fn create_user(
        &self,
        name: Option<&str>,
        email: Option<&str>,
        pin: Option<&str>,
        role: Option<Role>,
        permissions: Option<Vec<Permission>>,
    ) -> Result<User, AppError> {
        let pin = pin.unwrap_or(DEFAULT_PIN).to_owned();
        let pin_hash = tokio::task::spawn_blocking(move || {
            bcrypt::hash(&pin, bcrypt::DEFAULT_COST)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        self.user_repo
            .create(
                &self.pool,
                name.unwrap_or_default(),
                email.unwrap_or_default(),
                &pin_hash,
                role.unwrap_or(Role::Operator),
                permissions.as_deref().unwrap_or(&[]),
            )
            .await
    }

    /// Atualização parcial. Um PIN novo chega em claro e é re-hasheado
    /// aqui antes de tocar o banco.
    pub async fn update_user(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
        pin: Option<&str>,
        role: Option<Role>,
        permissions: Option<Vec<Permission>>,
    ) -> Result<User, AppError> {
        let pin_hash = match pin {
            Some(pin) => {
                let pin = pin.to_owned();
                let hash = tokio::task::spawn_blocking(move || {
                    bcrypt::hash(&pin, bcrypt::DEFAULT_COST)
                })
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
                Some(hash)
            }
            None => None,
        };

        self.user_repo
            .update(
                id,
                name,
                email,
                pin_hash.as_deref(),
                role,
                permissions.as_deref(),
            )
            .await?
            .ok_or(AppError::UserNotFound)
    }

    /// Exclui um usuário. A guarda de autoexclusão vem antes de qualquer
    /// escrita: ninguém derruba a própria sessão apagando a si mesmo.
    pub async fn delete_user(&self, id: Uuid, acting_user: &User) -> Result<(), AppError> {
        ensure_not_self(id, acting_user)?;
        if !self.user_repo.delete(id).await? {
            return Err(AppError::UserNotFound);
        }
        tracing::info!("Usuário {} excluído por {}", id, acting_user.name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn usuario(id: Uuid) -> User {
        User {
            id,
            name: "Gestor".into(),
            email: "gestor@lagoon.com".into(),
            pin_hash: "$2b$12$hash".into(),
            role: Role::Admin,
            permissions: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn excluir_a_si_mesmo_e_recusado_antes_de_qualquer_escrita() {
        let id = Uuid::new_v4();
        let gestor = usuario(id);

        match ensure_not_self(id, &gestor) {
            Err(AppError::SelfDeletionRejected) => {}
            other => panic!("esperava SelfDeletionRejected, veio {:?}", other),
        }
    }

    #[test]
    fn excluir_outro_usuario_passa_pela_guarda() {
        let gestor = usuario(Uuid::new_v4());
        assert!(ensure_not_self(Uuid::new_v4(), &gestor).is_ok());
    }
}
