//! Operational costs and sales.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{OperationalCostId, PaymentMethod, RecipeId, SaleId};

/// Period overhead not tied to a recipe (rent, utilities, equipment).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationalCost {
    /// Unique cost ID.
    pub id: OperationalCostId,
    /// What the cost is for.
    pub name: String,
    /// Amount paid.
    pub cost: Decimal,
    /// Day the cost was incurred.
    pub date_incurred: NaiveDate,
}

/// A recorded sale.
///
/// The totals are a snapshot taken when the sale was entered and are never
/// recomputed, even if the recipe is later changed or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    /// Unique sale ID.
    pub id: SaleId,
    /// Recipe sold; `None` once the recipe has been deleted.
    pub recipe_id: Option<RecipeId>,
    /// Recipe name at sale time.
    pub recipe_name: String,
    /// Units sold.
    pub quantity_sold: Decimal,
    /// Day of the sale.
    pub sale_date: NaiveDate,
    /// How the customer paid.
    pub payment_method: PaymentMethod,
    /// Delivery fee charged to the customer.
    pub delivery_fee: Decimal,
    /// Delivery cost paid by the business.
    pub delivery_cost: Decimal,
    /// Product revenue plus delivery fee.
    pub total_revenue: Decimal,
    /// Product cost plus delivery cost.
    pub total_cost: Decimal,
    /// `total_revenue - total_cost`.
    pub total_profit: Decimal,
}
