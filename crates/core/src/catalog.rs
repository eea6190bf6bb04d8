//! Ingredients, recipes and recipe line items.
//!
//! A recipe owns two ordered lists of line items. Ingredient lines are
//! snapshots: the name, unit and cost of the ingredient are copied when the
//! line is created, so later edits or deletion of the ingredient never change
//! what an existing recipe costs.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{IngredientId, RecipeId};

/// A purchasable ingredient and its current unit cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Unique ingredient ID.
    pub id: IngredientId,
    /// Unique display name.
    pub name: String,
    /// Cost of one unit.
    pub cost: Decimal,
    /// Unit label (e.g., "kg", "dozen").
    pub unit: String,
}

/// One ingredient entry on a recipe, frozen at the time it was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientLine {
    /// Source ingredient; `None` once that ingredient has been deleted.
    pub ingredient_id: Option<IngredientId>,
    /// Ingredient name at entry time.
    pub name: String,
    /// Unit label at entry time.
    pub unit: String,
    /// Quantity of the ingredient used by one batch.
    pub quantity: Decimal,
    /// `quantity * unit cost` at entry time.
    pub cost: Decimal,
}

impl IngredientLine {
    /// Freeze an ingredient line from the ingredient's current cost.
    ///
    /// Returns `None` if `quantity * cost` overflows.
    #[must_use]
    pub fn snapshot(ingredient: &Ingredient, quantity: Decimal) -> Option<Self> {
        let cost = quantity.checked_mul(ingredient.cost)?;
        Some(Self {
            ingredient_id: Some(ingredient.id),
            name: ingredient.name.clone(),
            unit: ingredient.unit.clone(),
            quantity,
            cost,
        })
    }
}

/// A labelled fixed cost attached to a recipe batch (gas, packaging, labour).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedCostLine {
    /// What the cost is for.
    pub label: String,
    /// Cost per batch.
    pub cost: Decimal,
}

/// A recipe with its yield, margin and line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique recipe ID.
    pub id: RecipeId,
    /// Unique display name.
    pub name: String,
    /// Units produced by one batch.
    pub total_quantity_yield: Decimal,
    /// Markup over unit cost, in percent.
    pub profit_margin: Decimal,
    /// Ingredient lines, in entry order.
    pub ingredients: Vec<IngredientLine>,
    /// Fixed-cost lines, in entry order.
    pub fixed_costs: Vec<FixedCostLine>,
    /// When the recipe was created.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn flour() -> Ingredient {
        Ingredient {
            id: IngredientId::new(1),
            name: "Flour".to_string(),
            cost: Decimal::new(450, 2),
            unit: "kg".to_string(),
        }
    }

    #[test]
    fn test_snapshot_freezes_cost() {
        let mut ingredient = flour();
        let line = IngredientLine::snapshot(&ingredient, Decimal::new(25, 1)).unwrap();
        assert_eq!(line.cost, Decimal::new(1125, 2));
        assert_eq!(line.name, "Flour");
        assert_eq!(line.unit, "kg");
        assert_eq!(line.ingredient_id, Some(IngredientId::new(1)));

        ingredient.cost = Decimal::new(900, 2);
        assert_eq!(line.cost, Decimal::new(1125, 2));
    }

    #[test]
    fn test_snapshot_overflow() {
        let mut ingredient = flour();
        ingredient.cost = Decimal::MAX;
        assert!(IngredientLine::snapshot(&ingredient, Decimal::new(2, 0)).is_none());
    }
}
