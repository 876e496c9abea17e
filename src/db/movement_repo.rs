// src/db/movement_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::inventory::{Movement, MovementType},
};

// Repositório do livro-razão de movimentações. Append-only: não existe
// UPDATE nem DELETE aqui, de propósito.
#[derive(Clone)]
pub struct MovementRepository {
    pool: PgPool,
}

impl MovementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Registra uma movimentação no livro-razão (auditoria).
    /// `product_name` e `user_name` são snapshots denormalizados.
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        product_name: &str,
        movement_type: MovementType,
        quantity: Decimal,
        user_id: Uuid,
        user_name: &str,
    ) -> Result<Movement, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movement = sqlx::query_as::<_, Movement>(
            r#"
            INSERT INTO movements (product_id, product_name, movement_type, quantity, user_id, user_name)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(product_id)
        .bind(product_name)
        .bind(movement_type)
        .bind(quantity)
        .bind(user_id)
        .bind(user_name)
        .fetch_one(executor)
        .await?;
        Ok(movement)
    }

    /// Histórico recente, mais novo primeiro, limitado aos 100 últimos
    /// registros para a listagem ao vivo.
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<Movement>, AppError> {
        let movements = sqlx::query_as::<_, Movement>(
            "SELECT * FROM movements ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(movements)
    }
}
