// src/models/inventory.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Unidades de medida ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "unit_type", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum UnitType {
    Un,
    Cx,
    Pc,
    Kg,
}

impl UnitType {
    /// Estoque mínimo padrão por unidade. Caixas fechadas disparam alerta
    /// com 1; o restante com 5. Esse mapeamento já mudou entre versões do
    /// catálogo e não é reaplicado retroativamente em produtos existentes.
    pub fn default_min_stock(&self) -> Decimal {
        match self {
            UnitType::Cx => Decimal::ONE,
            _ => Decimal::from(5),
        }
    }
}

// --- Produtos ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub unit: UnitType,
    pub quantity: Decimal,
    pub min_stock: Decimal,
    pub unit_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_stock
    }
}

// --- Movimentações ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "movement_type", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum MovementType {
    In,
    Out,
}

// Registro imutável do livro-razão. `product_name` e `user_name` são
// snapshots do momento da escrita: o histórico mostra os nomes da época
// do evento, não os atuais.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub quantity: Decimal,
    pub user_id: Uuid,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimo_padrao_por_unidade() {
        assert_eq!(UnitType::Cx.default_min_stock(), Decimal::ONE);
        assert_eq!(UnitType::Un.default_min_stock(), Decimal::from(5));
        assert_eq!(UnitType::Pc.default_min_stock(), Decimal::from(5));
        assert_eq!(UnitType::Kg.default_min_stock(), Decimal::from(5));
    }

    #[test]
    fn estoque_baixo_inclui_o_limite() {
        let mut produto = Product {
            id: Uuid::new_v4(),
            name: "Shoyo".into(),
            unit: UnitType::Un,
            quantity: Decimal::from(5),
            min_stock: Decimal::from(5),
            unit_price: Decimal::ZERO,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(produto.is_low_stock());

        produto.quantity = Decimal::from(6);
        assert!(!produto.is_low_stock());

        produto.quantity = Decimal::ZERO;
        assert!(produto.is_low_stock());
    }
}
