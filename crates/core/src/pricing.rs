//! Sale snapshot pricing.
//!
//! A sale is priced from the recipe's displayed metrics at entry time. The
//! resulting totals are stored with the sale and never recomputed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::costing::{CostingError, RecipeMetrics};
use crate::types::round_money;

/// What the user entered for a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleQuantities {
    pub quantity_sold: Decimal,
    #[serde(default)]
    pub delivery_fee: Decimal,
    #[serde(default)]
    pub delivery_cost: Decimal,
}

/// Frozen totals for a sale, rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleTotals {
    pub total_revenue: Decimal,
    pub total_cost: Decimal,
    pub total_profit: Decimal,
}

/// Price a sale against the recipe metrics the user was shown.
///
/// ```text
/// total_cost    = unit_cost  * quantity_sold + delivery_cost
/// total_revenue = sale_price * quantity_sold + delivery_fee
/// total_profit  = total_revenue - total_cost
/// ```
///
/// # Errors
///
/// Returns `CostingError::Overflow` if any product or sum exceeds the decimal range.
pub fn price_sale(
    metrics: &RecipeMetrics,
    quantities: SaleQuantities,
) -> Result<SaleTotals, CostingError> {
    let total_cost = metrics
        .unit_cost
        .checked_mul(quantities.quantity_sold)
        .and_then(|product| product.checked_add(quantities.delivery_cost))
        .ok_or(CostingError::Overflow)?;
    let total_revenue = metrics
        .sale_price
        .checked_mul(quantities.quantity_sold)
        .and_then(|product| product.checked_add(quantities.delivery_fee))
        .ok_or(CostingError::Overflow)?;
    let total_profit = total_revenue
        .checked_sub(total_cost)
        .ok_or(CostingError::Overflow)?;

    Ok(SaleTotals {
        total_revenue: round_money(total_revenue),
        total_cost: round_money(total_cost),
        total_profit: round_money(total_profit),
    })
}
