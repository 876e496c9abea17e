// src/services/inventory_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{MovementRepository, ProductRepository},
    models::{
        auth::User,
        inventory::{Movement, MovementType, Product, UnitType},
    },
};

/// Calcula a quantidade resultante de uma movimentação. Entrada soma sem
/// teto; saída que levaria o saldo abaixo de zero é rejeitada sem
/// nenhuma escrita.
fn compute_new_quantity(
    current: Decimal,
    movement_type: MovementType,
    quantity: Decimal,
) -> Result<Decimal, AppError> {
    match movement_type {
        MovementType::In => Ok(current + quantity),
        MovementType::Out => {
            let new_quantity = current - quantity;
            if new_quantity < Decimal::ZERO {
                return Err(AppError::InsufficientStock {
                    available: current,
                    requested: quantity,
                });
            }
            Ok(new_quantity)
        }
    }
}

/// Traduz uma contagem física em movimentação: a diferença entre o que
/// foi contado e o que o sistema registra vira uma entrada ou saída.
/// Contagem igual ao sistema não gera movimentação nenhuma.
fn audit_delta(current: Decimal, counted: Decimal) -> Option<(MovementType, Decimal)> {
    let delta = counted - current;
    if delta.is_zero() {
        return None;
    }
    if delta > Decimal::ZERO {
        Some((MovementType::In, delta))
    } else {
        Some((MovementType::Out, -delta))
    }
}

#[derive(Clone)]
pub struct InventoryService {
    product_repo: ProductRepository,
    movement_repo: MovementRepository,
    pool: PgPool,
}

impl InventoryService {
    pub fn new(
        product_repo: ProductRepository,
        movement_repo: MovementRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            product_repo,
            movement_repo,
            pool,
        }
    }

    // --- Catálogo ---

    pub async fn get_all_products(&self) -> Result<Vec<Product>, AppError> {
        self.product_repo.get_all().await
    }

    pub async fn create_product(
        &self,
        name: &str,
        unit: UnitType,
        quantity: Decimal,
        min_stock: Option<Decimal>,
        unit_price: Decimal,
    ) -> Result<Product, AppError> {
        // Sem mínimo explícito, deriva do tipo de unidade.
        let min_stock = min_stock.unwrap_or_else(|| unit.default_min_stock());
        self.product_repo
            .create(&self.pool, name, unit, quantity, min_stock, unit_price)
            .await
    }

    /// Edição manual de produto. Ajuste direto de quantidade por aqui NÃO
    /// gera movimentação no histórico (comportamento herdado do app:
    /// correções auditáveis devem passar pela averiguação).
    pub async fn update_product(
        &self,
        id: Uuid,
        name: Option<&str>,
        unit: Option<UnitType>,
        quantity: Option<Decimal>,
        min_stock: Option<Decimal>,
        unit_price: Option<Decimal>,
    ) -> Result<Product, AppError> {
        self.product_repo
            .update(id, name, unit, quantity, min_stock, unit_price)
            .await?
            .ok_or(AppError::ProductNotFound)
    }

    pub async fn delete_product(&self, id: Uuid) -> Result<(), AppError> {
        if !self.product_repo.delete(id).await? {
            return Err(AppError::ProductNotFound);
        }
        Ok(())
    }

    // --- Motor de movimentação ---

    /// Registra uma entrada ou saída de estoque.
    ///
    /// A atualização da quantidade e o registro no livro-razão acontecem
    /// na MESMA transação, com a linha do produto travada (FOR UPDATE).
    /// O app original fazia duas escritas independentes e podia deixar o
    /// saldo sem o registro correspondente; aqui ou ambos entram, ou nada.
    pub async fn register_movement(
        &self,
        product_id: Uuid,
        movement_type: MovementType,
        quantity: Decimal,
        acting_user: &User,
    ) -> Result<Movement, AppError> {
        let mut tx = self.pool.begin().await?;

        let product = self
            .product_repo
            .find_by_id_for_update(&mut *tx, product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        let new_quantity = compute_new_quantity(product.quantity, movement_type, quantity)?;

        self.product_repo
            .set_quantity(&mut *tx, product_id, new_quantity)
            .await?;

        let movement = self
            .movement_repo
            .insert(
                &mut *tx,
                product_id,
                &product.name,
                movement_type,
                quantity,
                acting_user.id,
                &acting_user.name,
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Movimentação {:?} de {} x '{}' por {} (saldo: {} -> {})",
            movement_type,
            quantity,
            product.name,
            acting_user.name,
            product.quantity,
            new_quantity
        );

        Ok(movement)
    }

    // --- Averiguação ---

    /// Reconcilia a contagem física de um produto com o saldo do sistema.
    /// O delta é calculado contra a linha já travada, não contra o valor
    /// que estava na tela de quem contou. Retorna a movimentação gerada,
    /// ou None se a contagem bateu com o sistema.
    pub async fn register_audit_count(
        &self,
        product_id: Uuid,
        counted_quantity: Decimal,
        acting_user: &User,
    ) -> Result<(Product, Option<Movement>), AppError> {
        let mut tx = self.pool.begin().await?;

        let product = self
            .product_repo
            .find_by_id_for_update(&mut *tx, product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        let Some((movement_type, quantity)) = audit_delta(product.quantity, counted_quantity)
        else {
            // Contagem confere: nenhuma escrita.
            tx.rollback().await?;
            return Ok((product, None));
        };

        let updated = self
            .product_repo
            .set_quantity(&mut *tx, product_id, counted_quantity)
            .await?;

        let movement = self
            .movement_repo
            .insert(
                &mut *tx,
                product_id,
                &product.name,
                movement_type,
                quantity,
                acting_user.id,
                &acting_user.name,
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Averiguação de '{}' por {}: sistema {} -> contado {}",
            product.name,
            acting_user.name,
            product.quantity,
            counted_quantity
        );

        Ok((updated, Some(movement)))
    }

    // --- Histórico ---

    pub async fn list_recent_movements(&self) -> Result<Vec<Movement>, AppError> {
        // Listagem ao vivo limitada aos 100 registros mais recentes.
        self.movement_repo.list_recent(100).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entrada_soma_sem_teto() {
        let result =
            compute_new_quantity(Decimal::from(10), MovementType::In, Decimal::from(500));
        assert_eq!(result.unwrap(), Decimal::from(510));
    }

    #[test]
    fn saida_dentro_do_saldo_subtrai() {
        let result =
            compute_new_quantity(Decimal::from(10), MovementType::Out, Decimal::from(10));
        assert_eq!(result.unwrap(), Decimal::ZERO);
    }

    #[test]
    fn saida_maior_que_saldo_e_rejeitada() {
        let result = compute_new_quantity(Decimal::from(3), MovementType::Out, Decimal::from(5));
        match result {
            Err(AppError::InsufficientStock {
                available,
                requested,
            }) => {
                assert_eq!(available, Decimal::from(3));
                assert_eq!(requested, Decimal::from(5));
            }
            other => panic!("esperava InsufficientStock, veio {:?}", other),
        }
    }

    #[test]
    fn contagem_menor_vira_saida() {
        // Sistema marca 10, balcão tem 7: sai exatamente 3.
        let delta = audit_delta(Decimal::from(10), Decimal::from(7));
        assert_eq!(delta, Some((MovementType::Out, Decimal::from(3))));
    }

    #[test]
    fn contagem_maior_vira_entrada() {
        let delta = audit_delta(Decimal::from(10), Decimal::from(12));
        assert_eq!(delta, Some((MovementType::In, Decimal::from(2))));
    }

    #[test]
    fn contagem_igual_nao_gera_movimentacao() {
        assert_eq!(audit_delta(Decimal::from(10), Decimal::from(10)), None);
    }
}
