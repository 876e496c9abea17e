// src/db/settings_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::common::error::AppError;

/// Chave do marcador de versão do catálogo semeado. Substitui o esquema
/// antigo de "farejar" só o item-sentinela para decidir se o banco está
/// desatualizado.
pub const CATALOG_VERSION_KEY: &str = "catalog_version";

// Repositório da tabela chave/valor 'system_settings'.
#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get<'e, E>(&self, executor: E, key: &str) -> Result<Option<String>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe_value: Option<(String,)> =
            sqlx::query_as("SELECT value FROM system_settings WHERE key = $1")
                .bind(key)
                .fetch_optional(executor)
                .await?;
        Ok(maybe_value.map(|(v,)| v))
    }

    /// UPSERT atômico: cria a chave ou sobrescreve o valor existente.
    pub async fn set<'e, E>(&self, executor: E, key: &str, value: &str) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO system_settings (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key)
            DO UPDATE SET value = $2, updated_at = NOW()
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(executor)
        .await?;
        Ok(())
    }
}
