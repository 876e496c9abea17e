// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::inventory::Product;

/// Resumo exibido na primeira aba do app: totais de produtos, alertas de
/// estoque baixo/zerado e, para quem pode ver financeiro, o valor
/// patrimonial (Σ quantidade × preço unitário).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_products: usize,
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,

    // Omitido para usuários sem 'view_financials'.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_value: Option<Decimal>,

    // Até 5 itens críticos para o painel de alertas.
    pub low_stock_products: Vec<Product>,
}
