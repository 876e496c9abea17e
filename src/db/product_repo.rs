// src/db/product_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::inventory::{Product, UnitType},
};

// Repositório da tabela 'products'. Leituras simples usam a pool;
// escritas aceitam um executor genérico para rodar dentro de transações.
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_all(&self) -> Result<Vec<Product>, AppError> {
        let products =
            sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(products)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        let maybe_product =
            sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(maybe_product)
    }

    /// Busca travando a linha (FOR UPDATE). Serializa movimentações
    /// concorrentes sobre o mesmo produto: o read-modify-write da
    /// quantidade deixa de perder atualizações.
    pub async fn find_by_id_for_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe_product =
            sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(maybe_product)
    }

    /// Verifica a presença de um produto pelo nome exato (usado pela
    /// reconciliação para sondar o item-sentinela do catálogo).
    pub async fn exists_by_name<'e, E>(
        &self,
        executor: E,
        name: &str,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM products WHERE name = $1)")
                .bind(name)
                .fetch_one(executor)
                .await?;
        Ok(exists.0)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        name: &str,
        unit: UnitType,
        quantity: Decimal,
        min_stock: Decimal,
        unit_price: Decimal,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, unit, quantity, min_stock, unit_price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(unit)
        .bind(quantity)
        .bind(min_stock)
        .bind(unit_price)
        .fetch_one(executor)
        .await?;
        Ok(product)
    }

    /// Atualização parcial: campos ausentes mantêm o valor atual
    /// (COALESCE). `updated_at` sempre avança.
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        unit: Option<UnitType>,
        quantity: Option<Decimal>,
        min_stock: Option<Decimal>,
        unit_price: Option<Decimal>,
    ) -> Result<Option<Product>, AppError> {
        let maybe_product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                name = COALESCE($2, name),
                unit = COALESCE($3, unit),
                quantity = COALESCE($4, quantity),
                min_stock = COALESCE($5, min_stock),
                unit_price = COALESCE($6, unit_price),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(unit)
        .bind(quantity)
        .bind(min_stock)
        .bind(unit_price)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_product)
    }

    /// Grava a nova quantidade calculada pelo motor de movimentação.
    /// Deve rodar na mesma transação do `find_by_id_for_update`.
    pub async fn set_quantity<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        quantity: Decimal,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET quantity = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(quantity)
        .fetch_one(executor)
        .await?;
        Ok(product)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Esvazia o catálogo inteiro. Só a reconciliação chama isso, e
    /// sempre dentro da transação que replanta o catálogo canônico.
    pub async fn delete_all<'e, E>(&self, executor: E) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM products").execute(executor).await?;
        Ok(result.rows_affected())
    }
}
