//! Recipe cost and suggested price calculation.
//!
//! Metrics are derived on every read and never persisted:
//!
//! ```text
//! total_ingredient_cost = Σ ingredient line cost
//! total_fixed_cost      = Σ fixed-cost line cost
//! total_production_cost = total_ingredient_cost + total_fixed_cost
//! unit_cost             = total_production_cost / yield      (0 when yield <= 0)
//! sale_price            = unit_cost * (1 + margin / 100)     (0 when yield <= 0)
//! ```
//!
//! [`CostBreakdown`] holds the full-precision values. [`RecipeMetrics`] is the
//! two-decimal view handed to clients; rounding happens once, at the end.
//!
//! A recipe whose stored lines cannot be costed (negative values, arithmetic
//! overflow) does not fail the caller. [`compute_metrics`] returns
//! [`RecipeCosting::Degraded`] carrying the raw recipe and the reason, so a
//! listing can still show the record and the caller decides how to report it.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::catalog::{FixedCostLine, IngredientLine, Recipe};
use crate::types::{RecipeId, round_money};

/// Which list a problematic line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Ingredient,
    FixedCost,
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ingredient => f.write_str("ingredient"),
            Self::FixedCost => f.write_str("fixed cost"),
        }
    }
}

/// Reasons a stored recipe cannot be costed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CostingError {
    /// An ingredient line has a negative quantity.
    #[error("ingredient line {position} ({name}) has a negative quantity")]
    NegativeQuantity {
        /// 1-based position in the ingredient list.
        position: usize,
        /// Ingredient name on the line.
        name: String,
    },

    /// A line has a negative cost.
    #[error("{kind} line {position} ({label}) has a negative cost")]
    NegativeCost {
        /// List the line belongs to.
        kind: LineKind,
        /// 1-based position in that list.
        position: usize,
        /// Name or label on the line.
        label: String,
    },

    /// A sum, quotient or product exceeded the decimal range.
    #[error("cost arithmetic overflowed")]
    Overflow,
}

/// Full-precision cost figures for one recipe batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostBreakdown {
    pub total_ingredient_cost: Decimal,
    pub total_fixed_cost: Decimal,
    pub total_production_cost: Decimal,
    pub unit_cost: Decimal,
    pub sale_price: Decimal,
}

impl CostBreakdown {
    /// Compute the breakdown for a recipe.
    ///
    /// # Errors
    ///
    /// Returns `CostingError` if a stored line holds a negative quantity or
    /// cost, or if any intermediate value overflows.
    pub fn compute(recipe: &Recipe) -> Result<Self, CostingError> {
        let total_ingredient_cost = sum_ingredient_lines(&recipe.ingredients)?;
        let total_fixed_cost = sum_fixed_cost_lines(&recipe.fixed_costs)?;
        let total_production_cost = total_ingredient_cost
            .checked_add(total_fixed_cost)
            .ok_or(CostingError::Overflow)?;

        // A non-positive yield has no meaningful unit; price it at zero.
        let (unit_cost, sale_price) = if recipe.total_quantity_yield > Decimal::ZERO {
            let unit_cost = total_production_cost
                .checked_div(recipe.total_quantity_yield)
                .ok_or(CostingError::Overflow)?;
            let sale_price = unit_cost
                .checked_mul(markup_factor(recipe.profit_margin)?)
                .ok_or(CostingError::Overflow)?;
            (unit_cost, sale_price)
        } else {
            (Decimal::ZERO, Decimal::ZERO)
        };

        Ok(Self {
            total_ingredient_cost,
            total_fixed_cost,
            total_production_cost,
            unit_cost,
            sale_price,
        })
    }
}

/// `1 + margin / 100`.
fn markup_factor(profit_margin: Decimal) -> Result<Decimal, CostingError> {
    profit_margin
        .checked_div(Decimal::ONE_HUNDRED)
        .and_then(|fraction| Decimal::ONE.checked_add(fraction))
        .ok_or(CostingError::Overflow)
}

fn sum_ingredient_lines(lines: &[IngredientLine]) -> Result<Decimal, CostingError> {
    lines
        .iter()
        .enumerate()
        .try_fold(Decimal::ZERO, |total, (index, line)| {
            if line.quantity.is_sign_negative() && !line.quantity.is_zero() {
                return Err(CostingError::NegativeQuantity {
                    position: index + 1,
                    name: line.name.clone(),
                });
            }
            if line.cost.is_sign_negative() && !line.cost.is_zero() {
                return Err(CostingError::NegativeCost {
                    kind: LineKind::Ingredient,
                    position: index + 1,
                    label: line.name.clone(),
                });
            }
            total.checked_add(line.cost).ok_or(CostingError::Overflow)
        })
}

fn sum_fixed_cost_lines(lines: &[FixedCostLine]) -> Result<Decimal, CostingError> {
    lines
        .iter()
        .enumerate()
        .try_fold(Decimal::ZERO, |total, (index, line)| {
            if line.cost.is_sign_negative() && !line.cost.is_zero() {
                return Err(CostingError::NegativeCost {
                    kind: LineKind::FixedCost,
                    position: index + 1,
                    label: line.label.clone(),
                });
            }
            total.checked_add(line.cost).ok_or(CostingError::Overflow)
        })
}

/// Derived recipe metrics rounded to cents for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecipeMetrics {
    pub total_ingredient_cost: Decimal,
    pub total_fixed_cost: Decimal,
    pub total_production_cost: Decimal,
    pub unit_cost: Decimal,
    pub sale_price: Decimal,
}

impl From<CostBreakdown> for RecipeMetrics {
    fn from(breakdown: CostBreakdown) -> Self {
        Self {
            total_ingredient_cost: round_money(breakdown.total_ingredient_cost),
            total_fixed_cost: round_money(breakdown.total_fixed_cost),
            total_production_cost: round_money(breakdown.total_production_cost),
            unit_cost: round_money(breakdown.unit_cost),
            sale_price: round_money(breakdown.sale_price),
        }
    }
}

/// A recipe together with its derived metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeWithMetrics {
    #[serde(flatten)]
    pub recipe: Recipe,
    #[serde(flatten)]
    pub metrics: RecipeMetrics,
}

/// A recipe that could not be costed, returned as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DegradedRecipe {
    #[serde(flatten)]
    pub recipe: Recipe,
    #[serde(rename = "costing_error", serialize_with = "serialize_display")]
    pub reason: CostingError,
}

fn serialize_display<S: Serializer>(value: &CostingError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Outcome of costing one recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "costing_status", rename_all = "snake_case")]
pub enum RecipeCosting {
    /// Metrics were derived.
    Computed(RecipeWithMetrics),
    /// The stored lines are unusable; the raw recipe is returned without metrics.
    Degraded(DegradedRecipe),
}

impl RecipeCosting {
    /// ID of the underlying recipe.
    #[must_use]
    pub const fn id(&self) -> RecipeId {
        self.recipe().id
    }

    /// The underlying recipe, whether or not it was costed.
    #[must_use]
    pub const fn recipe(&self) -> &Recipe {
        match self {
            Self::Computed(computed) => &computed.recipe,
            Self::Degraded(degraded) => &degraded.recipe,
        }
    }

    /// Derived metrics, if the recipe could be costed.
    #[must_use]
    pub const fn metrics(&self) -> Option<&RecipeMetrics> {
        match self {
            Self::Computed(computed) => Some(&computed.metrics),
            Self::Degraded(_) => None,
        }
    }

    /// Why costing failed, if it did.
    #[must_use]
    pub const fn degraded_reason(&self) -> Option<&CostingError> {
        match self {
            Self::Computed(_) => None,
            Self::Degraded(degraded) => Some(&degraded.reason),
        }
    }
}

/// Derive the display metrics for a recipe.
///
/// Never fails: unusable stored data yields [`RecipeCosting::Degraded`].
#[must_use]
pub fn compute_metrics(recipe: Recipe) -> RecipeCosting {
    match CostBreakdown::compute(&recipe) {
        Ok(breakdown) => RecipeCosting::Computed(RecipeWithMetrics {
            recipe,
            metrics: breakdown.into(),
        }),
        Err(reason) => RecipeCosting::Degraded(DegradedRecipe { recipe, reason }),
    }
}
