//! Recipe route handlers.
//!
//! Recipes are returned with their derived metrics. A recipe whose stored
//! lines cannot be costed is still listed, marked `"costing_status": "degraded"`
//! and without metric fields.

use std::sync::Arc;

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::Deserialize;

use bakeledger_core::{FixedCostLine, IngredientId, RecipeCosting, RecipeId};

use crate::db::{NumericColumn, RecipeRepository};
use crate::db::recipes::{NewIngredientLine, NewRecipe};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

use super::DeleteResponse;
use super::extract::{ApiJson, ApiPath};
use super::validate::{bounded, non_negative, required_text};

/// Ingredient reference in `POST /api/recipes`.
#[derive(Debug, Deserialize)]
pub struct IngredientLineRequest {
    pub ingredient_id: IngredientId,
    pub quantity: Decimal,
}

/// Fixed cost in `POST /api/recipes`.
#[derive(Debug, Deserialize)]
pub struct FixedCostRequest {
    pub label: String,
    pub cost: Decimal,
}

/// Body of `POST /api/recipes`.
#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    pub name: String,
    pub total_quantity_yield: Decimal,
    pub profit_margin: Decimal,
    #[serde(default)]
    pub ingredients: Vec<IngredientLineRequest>,
    #[serde(default)]
    pub fixed_costs: Vec<FixedCostRequest>,
}

impl CreateRecipeRequest {
    fn validate(self) -> Result<NewRecipe> {
        let ingredients = self
            .ingredients
            .into_iter()
            .map(|line| {
                Ok(NewIngredientLine {
                    ingredient_id: line.ingredient_id,
                    quantity: non_negative(
                        "ingredient quantity",
                        line.quantity,
                        NumericColumn::Quantity,
                    )?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let fixed_costs = self
            .fixed_costs
            .into_iter()
            .map(|line| {
                Ok(FixedCostLine {
                    label: required_text("fixed cost label", &line.label)?,
                    cost: non_negative("fixed cost", line.cost, NumericColumn::Money)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(NewRecipe {
            name: required_text("name", &self.name)?,
            total_quantity_yield: bounded(
                "total_quantity_yield",
                self.total_quantity_yield,
                NumericColumn::Quantity,
            )?,
            profit_margin: bounded("profit_margin", self.profit_margin, NumericColumn::Margin)?,
            ingredients,
            fixed_costs,
        })
    }
}

/// Look up a recipe's costing, reading through the cache.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the recipe does not exist.
pub async fn load_costing(state: &AppState, id: RecipeId) -> Result<Arc<RecipeCosting>> {
    if let Some(costing) = state.recipe_costs().get(id).await {
        return Ok(costing);
    }

    let recipe = RecipeRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("recipe {id} not found")))?;

    Ok(state.recipe_costs().cost(recipe).await)
}

/// List recipes ordered by name, with metrics.
///
/// GET /api/recipes
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Vec<RecipeCosting>>> {
    let recipes = RecipeRepository::new(state.pool()).list().await?;

    let mut costings = Vec::with_capacity(recipes.len());
    for recipe in recipes {
        let costing = state.recipe_costs().cost(recipe).await;
        costings.push(RecipeCosting::clone(&costing));
    }

    Ok(Json(costings))
}

/// Get one recipe with metrics.
///
/// GET /api/recipes/{id}
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    ApiPath(id): ApiPath<RecipeId>,
) -> Result<Json<RecipeCosting>> {
    let costing = load_costing(&state, id).await?;
    Ok(Json(RecipeCosting::clone(&costing)))
}

/// Create a recipe, freezing the current cost of each ingredient.
///
/// POST /api/recipes
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    ApiJson(body): ApiJson<CreateRecipeRequest>,
) -> Result<Json<RecipeCosting>> {
    let input = body.validate()?;

    let recipe = RecipeRepository::new(state.pool()).create(&input).await?;
    tracing::info!(
        recipe_id = %recipe.id,
        name = %recipe.name,
        ingredient_lines = recipe.ingredients.len(),
        fixed_cost_lines = recipe.fixed_costs.len(),
        "recipe created"
    );

    let costing = state.recipe_costs().cost(recipe).await;
    Ok(Json(RecipeCosting::clone(&costing)))
}

/// Delete a recipe. Sales keep their snapshot and lose the reference.
///
/// DELETE /api/recipes/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    ApiPath(id): ApiPath<RecipeId>,
) -> Result<Json<DeleteResponse>> {
    let deleted = RecipeRepository::new(state.pool()).delete(id).await?;
    state.recipe_costs().invalidate(id).await;

    if deleted {
        tracing::info!(recipe_id = %id, "recipe deleted");
    }

    Ok(Json(DeleteResponse { deleted }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request(json: &str) -> CreateRecipeRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_validate_trims_and_keeps_order() {
        let input = request(
            r#"{
                "name": " Brigadeiro ",
                "total_quantity_yield": "30",
                "profit_margin": "80",
                "ingredients": [
                    {"ingredient_id": 3, "quantity": "0.395"},
                    {"ingredient_id": 1, "quantity": "1"}
                ],
                "fixed_costs": [{"label": "Gas", "cost": "2.5"}]
            }"#,
        )
        .validate()
        .unwrap();

        assert_eq!(input.name, "Brigadeiro");
        assert_eq!(input.ingredients[0].ingredient_id, IngredientId::new(3));
        assert_eq!(input.ingredients[1].ingredient_id, IngredientId::new(1));
        assert_eq!(input.fixed_costs[0].cost, Decimal::new(25, 1));
    }

    #[test]
    fn test_lists_default_to_empty() {
        let input = request(r#"{"name": "Water", "total_quantity_yield": 1, "profit_margin": 0}"#)
            .validate()
            .unwrap();
        assert!(input.ingredients.is_empty());
        assert!(input.fixed_costs.is_empty());
    }

    #[test]
    fn test_non_positive_yield_is_accepted() {
        let input = request(r#"{"name": "Test", "total_quantity_yield": 0, "profit_margin": 10}"#)
            .validate()
            .unwrap();
        assert_eq!(input.total_quantity_yield, Decimal::ZERO);
    }

    #[test]
    fn test_rejects_negative_lines() {
        let negative_quantity = request(
            r#"{"name": "X", "total_quantity_yield": 1, "profit_margin": 0,
                "ingredients": [{"ingredient_id": 1, "quantity": "-2"}]}"#,
        );
        assert!(matches!(
            negative_quantity.validate(),
            Err(AppError::BadRequest(_))
        ));

        let negative_cost = request(
            r#"{"name": "X", "total_quantity_yield": 1, "profit_margin": 0,
                "fixed_costs": [{"label": "Box", "cost": "-1"}]}"#,
        );
        assert!(matches!(negative_cost.validate(), Err(AppError::BadRequest(_))));

        let blank_label = request(
            r#"{"name": "X", "total_quantity_yield": 1, "profit_margin": 0,
                "fixed_costs": [{"label": " ", "cost": "1"}]}"#,
        );
        assert!(matches!(blank_label.validate(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_rejects_amounts_beyond_column_range() {
        let margin = request(r#"{"name": "X", "total_quantity_yield": 1, "profit_margin": 100000}"#);
        assert!(matches!(margin.validate(), Err(AppError::BadRequest(_))));

        let yield_ = request(
            r#"{"name": "X", "total_quantity_yield": "100000000", "profit_margin": 0}"#,
        );
        assert!(matches!(yield_.validate(), Err(AppError::BadRequest(_))));

        let quantity = request(
            r#"{"name": "X", "total_quantity_yield": 1, "profit_margin": 0,
                "ingredients": [{"ingredient_id": 1, "quantity": "100000000"}]}"#,
        );
        assert!(matches!(quantity.validate(), Err(AppError::BadRequest(_))));

        let fixed = request(
            r#"{"name": "X", "total_quantity_yield": 1, "profit_margin": 0,
                "fixed_costs": [{"label": "Oven", "cost": "1000000000"}]}"#,
        );
        assert!(matches!(fixed.validate(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_accepts_largest_storable_values() {
        let input = request(
            r#"{"name": "X", "total_quantity_yield": "99999999.9999", "profit_margin": "-99999.99",
                "ingredients": [{"ingredient_id": 1, "quantity": "0.00005"}]}"#,
        )
        .validate()
        .unwrap();
        assert_eq!(input.profit_margin, Decimal::new(-9_999_999, 2));
        assert_eq!(input.ingredients[0].quantity, Decimal::new(1, 4));
    }
}
