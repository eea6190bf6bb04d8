//! Period profit report aggregation.
//!
//! The caller filters sales and operational costs to a [`DateRange`](crate::DateRange)
//! first; [`aggregate`] only sums what it is given. Sums are carried at full
//! precision and rounded by [`Report::rounded`] for display.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::ledger::{OperationalCost, Sale};
use crate::types::{CurrencyCode, Money, round_money};

/// Shown in place of the cost breakdown when no costs fall in the period.
pub const NO_COSTS_LOGGED: &str = "No costs logged.";

/// Width the cost label is padded to in the text breakdown.
pub const LABEL_WIDTH: usize = 15;

/// One operational cost as listed in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostBreakdownLine {
    pub date: NaiveDate,
    pub label: String,
    pub cost: Decimal,
}

/// Totals for a reporting period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Σ sale revenue.
    pub total_revenue: Decimal,
    /// Σ sale profit.
    pub total_gross_profit: Decimal,
    /// Σ operational cost.
    pub total_operational_costs: Decimal,
    /// Gross profit minus operational costs.
    pub net_profit: Decimal,
    /// Number of sales in the period.
    pub sales_count: usize,
    /// Operational costs in the order they were given.
    pub cost_breakdown: Vec<CostBreakdownLine>,
}

/// Sum the sales and operational costs of a period.
#[must_use]
pub fn aggregate(sales: &[Sale], costs: &[OperationalCost]) -> Report {
    let total_revenue: Decimal = sales.iter().map(|sale| sale.total_revenue).sum();
    let total_gross_profit: Decimal = sales.iter().map(|sale| sale.total_profit).sum();
    let total_operational_costs: Decimal = costs.iter().map(|cost| cost.cost).sum();

    Report {
        total_revenue,
        total_gross_profit,
        total_operational_costs,
        net_profit: total_gross_profit - total_operational_costs,
        sales_count: sales.len(),
        cost_breakdown: costs
            .iter()
            .map(|cost| CostBreakdownLine {
                date: cost.date_incurred,
                label: cost.name.clone(),
                cost: cost.cost,
            })
            .collect(),
    }
}

impl Report {
    /// Copy of the report with every amount rounded to cents.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            total_revenue: round_money(self.total_revenue),
            total_gross_profit: round_money(self.total_gross_profit),
            total_operational_costs: round_money(self.total_operational_costs),
            net_profit: round_money(self.net_profit),
            sales_count: self.sales_count,
            cost_breakdown: self
                .cost_breakdown
                .iter()
                .map(|line| CostBreakdownLine {
                    cost: round_money(line.cost),
                    ..line.clone()
                })
                .collect(),
        }
    }

    /// Itemized operational costs, one line per cost:
    ///
    /// ```text
    /// - 2024-03-01 | Rent            | R$ 1200.00
    /// ```
    ///
    /// Returns [`NO_COSTS_LOGGED`] when there are none.
    #[must_use]
    pub fn cost_breakdown_text(&self, currency: CurrencyCode) -> String {
        if self.cost_breakdown.is_empty() {
            return NO_COSTS_LOGGED.to_string();
        }

        self.cost_breakdown
            .iter()
            .map(|line| {
                format!(
                    "- {} | {:<width$} | {}",
                    line.date,
                    line.label,
                    Money::new(line.cost, currency),
                    width = LABEL_WIDTH,
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{OperationalCostId, PaymentMethod, RecipeId, SaleId};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn sale(id: i32, revenue: &str, profit: &str) -> Sale {
        Sale {
            id: SaleId::new(id),
            recipe_id: Some(RecipeId::new(1)),
            recipe_name: "Cake".to_string(),
            quantity_sold: Decimal::ONE,
            sale_date: date(5),
            payment_method: PaymentMethod::Pix,
            delivery_fee: Decimal::ZERO,
            delivery_cost: Decimal::ZERO,
            total_revenue: dec(revenue),
            total_cost: dec(revenue) - dec(profit),
            total_profit: dec(profit),
        }
    }

    fn cost(id: i32, name: &str, amount: &str, day: u32) -> OperationalCost {
        OperationalCost {
            id: OperationalCostId::new(id),
            name: name.to_string(),
            cost: dec(amount),
            date_incurred: date(day),
        }
    }

    #[test]
    fn test_empty_period() {
        let report = aggregate(&[], &[]);
        assert_eq!(report.total_revenue, Decimal::ZERO);
        assert_eq!(report.total_gross_profit, Decimal::ZERO);
        assert_eq!(report.total_operational_costs, Decimal::ZERO);
        assert_eq!(report.net_profit, Decimal::ZERO);
        assert_eq!(report.sales_count, 0);
        assert_eq!(report.cost_breakdown_text(CurrencyCode::BRL), NO_COSTS_LOGGED);
    }

    #[test]
    fn test_reference_scenario() {
        let report = aggregate(
            &[sale(1, "100", "40"), sale(2, "50", "20")],
            &[cost(1, "Rent", "30", 1)],
        );
        assert_eq!(report.total_revenue, dec("150"));
        assert_eq!(report.total_gross_profit, dec("60"));
        assert_eq!(report.total_operational_costs, dec("30"));
        assert_eq!(report.net_profit, dec("30"));
        assert_eq!(report.sales_count, 2);
    }

    #[test]
    fn test_costs_without_sales_is_a_loss() {
        let report = aggregate(&[], &[cost(1, "Rent", "800", 1), cost(2, "Power", "120.55", 3)]);
        assert_eq!(report.net_profit, dec("-920.55"));
    }

    #[test]
    fn test_sums_are_not_rounded_until_display() {
        let report = aggregate(&[], &[cost(1, "A", "0.004", 1), cost(2, "B", "0.004", 2)]);
        assert_eq!(report.total_operational_costs, dec("0.008"));
        assert_eq!(report.rounded().total_operational_costs, dec("0.01"));
    }

    #[test]
    fn test_cost_breakdown_text() {
        let report = aggregate(
            &[],
            &[cost(1, "Rent", "1200", 1), cost(2, "Gas refill", "95.5", 14)],
        );
        assert_eq!(
            report.cost_breakdown_text(CurrencyCode::BRL),
            "- 2024-03-01 | Rent            | R$ 1200.00\n\
             - 2024-03-14 | Gas refill      | R$ 95.50"
        );
    }

    #[test]
    fn test_long_labels_are_not_truncated() {
        let report = aggregate(&[], &[cost(1, "Commercial kitchen rent", "10", 1)]);
        assert_eq!(
            report.cost_breakdown_text(CurrencyCode::USD),
            "- 2024-03-01 | Commercial kitchen rent | $ 10.00"
        );
    }
}
