// src/services/dashboard_service.rs

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::ProductRepository,
    models::{dashboard::DashboardSummary, inventory::Product},
};

/// Agrega o estoque para o painel inicial. Função pura sobre a lista de
/// produtos; o financeiro só entra quando o chamador pode vê-lo.
fn build_summary(products: Vec<Product>, include_financials: bool) -> DashboardSummary {
    let total_products = products.len();
    let low_stock_count = products.iter().filter(|p| p.is_low_stock()).count();
    let out_of_stock_count = products
        .iter()
        .filter(|p| p.quantity == Decimal::ZERO)
        .count();

    let total_value = include_financials.then(|| {
        products
            .iter()
            .map(|p| p.quantity * p.unit_price)
            .sum::<Decimal>()
    });

    let low_stock_products = products
        .into_iter()
        .filter(|p| p.is_low_stock())
        .take(5)
        .collect();

    DashboardSummary {
        total_products,
        low_stock_count,
        out_of_stock_count,
        total_value,
        low_stock_products,
    }
}

#[derive(Clone)]
pub struct DashboardService {
    product_repo: ProductRepository,
}

impl DashboardService {
    pub fn new(product_repo: ProductRepository) -> Self {
        Self { product_repo }
    }

    pub async fn get_summary(
        &self,
        include_financials: bool,
    ) -> Result<DashboardSummary, AppError> {
        let products = self.product_repo.get_all().await?;
        Ok(build_summary(products, include_financials))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::inventory::UnitType;
    use chrono::Utc;
    use uuid::Uuid;

    fn produto(name: &str, quantity: u32, min_stock: u32, unit_price: u32) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: name.into(),
            unit: UnitType::Un,
            quantity: Decimal::from(quantity),
            min_stock: Decimal::from(min_stock),
            unit_price: Decimal::from(unit_price),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn resumo_conta_baixos_e_zerados() {
        let produtos = vec![
            produto("Gin", 24, 5, 80),
            produto("Shoyo", 2, 5, 12),
            produto("Melancia", 0, 5, 15),
        ];
        let resumo = build_summary(produtos, false);

        assert_eq!(resumo.total_products, 3);
        assert_eq!(resumo.low_stock_count, 2); // Shoyo e Melancia
        assert_eq!(resumo.out_of_stock_count, 1);
        assert_eq!(resumo.total_value, None);
        assert_eq!(resumo.low_stock_products.len(), 2);
    }

    #[test]
    fn valor_patrimonial_so_com_permissao() {
        let produtos = vec![produto("Gin", 24, 5, 80), produto("Shoyo", 2, 5, 12)];
        let resumo = build_summary(produtos, true);

        // 24 * 80 + 2 * 12 = 1944
        assert_eq!(resumo.total_value, Some(Decimal::from(1944)));
    }

    #[test]
    fn painel_de_alertas_limita_a_cinco_itens() {
        let produtos: Vec<Product> =
            (0..8).map(|i| produto(&format!("Item {}", i), 1, 5, 0)).collect();
        let resumo = build_summary(produtos, false);

        assert_eq!(resumo.low_stock_count, 8);
        assert_eq!(resumo.low_stock_products.len(), 5);
    }
}
