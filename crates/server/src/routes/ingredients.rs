//! Ingredient route handlers.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::Deserialize;

use bakeledger_core::{Ingredient, IngredientId};

use crate::db::{IngredientRepository, NumericColumn};
use crate::db::ingredients::NewIngredient;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

use super::DeleteResponse;
use super::extract::{ApiJson, ApiPath};
use super::validate::{non_negative, required_text};

/// Body of `POST /api/ingredients`.
#[derive(Debug, Deserialize)]
pub struct CreateIngredientRequest {
    pub name: String,
    pub cost: Decimal,
    pub unit: String,
}

impl CreateIngredientRequest {
    fn validate(self) -> Result<NewIngredient> {
        Ok(NewIngredient {
            name: required_text("name", &self.name)?,
            cost: non_negative("cost", self.cost, NumericColumn::Money)?,
            unit: required_text("unit", &self.unit)?,
        })
    }
}

/// List ingredients ordered by name.
///
/// GET /api/ingredients
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Vec<Ingredient>>> {
    let ingredients = IngredientRepository::new(state.pool()).list().await?;
    Ok(Json(ingredients))
}

/// Get one ingredient.
///
/// GET /api/ingredients/{id}
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    ApiPath(id): ApiPath<IngredientId>,
) -> Result<Json<Ingredient>> {
    let ingredient = IngredientRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("ingredient {id} not found")))?;
    Ok(Json(ingredient))
}

/// Create an ingredient.
///
/// POST /api/ingredients
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    ApiJson(body): ApiJson<CreateIngredientRequest>,
) -> Result<Json<Ingredient>> {
    let input = body.validate()?;

    let ingredient = IngredientRepository::new(state.pool())
        .create(&input)
        .await?;
    tracing::info!(ingredient_id = %ingredient.id, name = %ingredient.name, "ingredient created");

    Ok(Json(ingredient))
}

/// Delete an ingredient. Deleting a missing ID is not an error.
///
/// Recipe lines keep their snapshot and lose the reference.
///
/// DELETE /api/ingredients/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    ApiPath(id): ApiPath<IngredientId>,
) -> Result<Json<DeleteResponse>> {
    let deleted = IngredientRepository::new(state.pool()).delete(id).await?;
    if deleted {
        state.recipe_costs().invalidate_ingredient(id).await;
    }
    Ok(Json(DeleteResponse { deleted }))
}
