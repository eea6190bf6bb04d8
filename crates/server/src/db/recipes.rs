//! Recipe repository.
//!
//! A recipe is stored as a header row plus two ordered line tables. Lines are
//! written in the same transaction as the header and loaded in one query per
//! table for any number of recipes.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use bakeledger_core::{
    FixedCostLine, Ingredient, IngredientId, IngredientLine, Recipe, RecipeId, round_money,
};

use super::{NumericColumn, RepositoryError};
use super::ingredients::IngredientRow;

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct RecipeRow {
    id: i32,
    name: String,
    total_quantity_yield: Decimal,
    profit_margin: Decimal,
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct IngredientLineRow {
    recipe_id: i32,
    ingredient_id: Option<i32>,
    name: String,
    unit: String,
    quantity: Decimal,
    cost: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
struct FixedCostLineRow {
    recipe_id: i32,
    label: String,
    cost: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
struct CreatedRow {
    id: i32,
    total_quantity_yield: Decimal,
    profit_margin: Decimal,
    created_at: DateTime<Utc>,
}

// =============================================================================
// Inputs
// =============================================================================

/// An ingredient reference on a new recipe.
#[derive(Debug, Clone, Copy)]
pub struct NewIngredientLine {
    pub ingredient_id: IngredientId,
    pub quantity: Decimal,
}

/// Fields for a new recipe.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub name: String,
    pub total_quantity_yield: Decimal,
    pub profit_margin: Decimal,
    pub ingredients: Vec<NewIngredientLine>,
    pub fixed_costs: Vec<FixedCostLine>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for recipe database operations.
pub struct RecipeRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RecipeRepository<'a> {
    /// Create a new recipe repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all recipes ordered by name, with their lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(&self) -> Result<Vec<Recipe>, RepositoryError> {
        let rows = sqlx::query_as::<_, RecipeRow>(
            r"
            SELECT id, name, total_quantity_yield, profit_margin, created_at
            FROM recipes
            ORDER BY name ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        self.attach_lines(rows).await
    }

    /// Get a recipe with its lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(&self, id: RecipeId) -> Result<Option<Recipe>, RepositoryError> {
        let row = sqlx::query_as::<_, RecipeRow>(
            r"
            SELECT id, name, total_quantity_yield, profit_margin, created_at
            FROM recipes
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(self.attach_lines(vec![row]).await?.pop())
    }

    /// Create a recipe and its lines in one transaction.
    ///
    /// Each ingredient line is frozen from the ingredient's cost as read
    /// inside the transaction. Line costs are stored rounded to cents, and the
    /// returned recipe carries the values as stored.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name is already taken.
    /// Returns `RepositoryError::Invalid` if an ingredient does not exist or a
    /// line quantity or cost does not fit its column.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, input: &NewRecipe) -> Result<Recipe, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, CreatedRow>(
            r"
            INSERT INTO recipes (name, total_quantity_yield, profit_margin)
            VALUES ($1, $2, $3)
            RETURNING id, total_quantity_yield, profit_margin, created_at
            ",
        )
        .bind(&input.name)
        .bind(input.total_quantity_yield)
        .bind(input.profit_margin)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_unique_violation(e, "recipe name already exists"))?;

        let mut ingredients = Vec::with_capacity(input.ingredients.len());
        for (position, requested) in (1_i32..).zip(&input.ingredients) {
            let ingredient: Ingredient = sqlx::query_as::<_, IngredientRow>(
                "SELECT id, name, cost, unit FROM ingredients WHERE id = $1 FOR SHARE",
            )
            .bind(requested.ingredient_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                RepositoryError::Invalid(format!("unknown ingredient {}", requested.ingredient_id))
            })?
            .into();

            let quantity = NumericColumn::Quantity.fit(requested.quantity).ok_or_else(|| {
                RepositoryError::Invalid(format!("quantity of {} is out of range", ingredient.name))
            })?;
            let mut line = IngredientLine::snapshot(&ingredient, quantity)
                .filter(|line| NumericColumn::Money.fit(line.cost).is_some())
                .ok_or_else(|| {
                    RepositoryError::Invalid(format!(
                        "line cost for {} exceeds {}",
                        ingredient.name,
                        NumericColumn::Money.max()
                    ))
                })?;
            line.cost = round_money(line.cost);

            sqlx::query(
                r"
                INSERT INTO recipe_ingredient_line
                    (recipe_id, position, ingredient_id, name, unit, quantity, cost)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ",
            )
            .bind(created.id)
            .bind(position)
            .bind(line.ingredient_id)
            .bind(&line.name)
            .bind(&line.unit)
            .bind(line.quantity)
            .bind(line.cost)
            .execute(&mut *tx)
            .await?;

            ingredients.push(line);
        }

        let mut fixed_costs = Vec::with_capacity(input.fixed_costs.len());
        for (position, requested) in (1_i32..).zip(&input.fixed_costs) {
            let line = FixedCostLine {
                label: requested.label.clone(),
                cost: round_money(requested.cost),
            };

            sqlx::query(
                r"
                INSERT INTO recipe_fixed_cost_line (recipe_id, position, label, cost)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(created.id)
            .bind(position)
            .bind(&line.label)
            .bind(line.cost)
            .execute(&mut *tx)
            .await?;

            fixed_costs.push(line);
        }

        tx.commit().await?;

        Ok(Recipe {
            id: RecipeId::new(created.id),
            name: input.name.clone(),
            total_quantity_yield: created.total_quantity_yield,
            profit_margin: created.profit_margin,
            ingredients,
            fixed_costs,
            created_at: created.created_at,
        })
    }

    /// Delete a recipe.
    ///
    /// Its lines are removed with it. Sales that reference it keep their
    /// snapshot and have `recipe_id` cleared.
    ///
    /// # Returns
    ///
    /// `true` if a row was deleted, `false` if the ID did not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: RecipeId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Load the lines for a batch of recipe rows, preserving row order.
    async fn attach_lines(&self, rows: Vec<RecipeRow>) -> Result<Vec<Recipe>, RepositoryError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();

        let ingredient_rows = sqlx::query_as::<_, IngredientLineRow>(
            r"
            SELECT recipe_id, ingredient_id, name, unit, quantity, cost
            FROM recipe_ingredient_line
            WHERE recipe_id = ANY($1)
            ORDER BY recipe_id, position
            ",
        )
        .bind(ids.as_slice())
        .fetch_all(self.pool)
        .await?;

        let fixed_rows = sqlx::query_as::<_, FixedCostLineRow>(
            r"
            SELECT recipe_id, label, cost
            FROM recipe_fixed_cost_line
            WHERE recipe_id = ANY($1)
            ORDER BY recipe_id, position
            ",
        )
        .bind(ids.as_slice())
        .fetch_all(self.pool)
        .await?;

        let mut ingredients: HashMap<i32, Vec<IngredientLine>> = HashMap::new();
        for line in ingredient_rows {
            ingredients
                .entry(line.recipe_id)
                .or_default()
                .push(IngredientLine {
                    ingredient_id: line.ingredient_id.map(IngredientId::new),
                    name: line.name,
                    unit: line.unit,
                    quantity: line.quantity,
                    cost: line.cost,
                });
        }

        let mut fixed_costs: HashMap<i32, Vec<FixedCostLine>> = HashMap::new();
        for line in fixed_rows {
            fixed_costs
                .entry(line.recipe_id)
                .or_default()
                .push(FixedCostLine {
                    label: line.label,
                    cost: line.cost,
                });
        }

        Ok(rows
            .into_iter()
            .map(|row| Recipe {
                id: RecipeId::new(row.id),
                name: row.name,
                total_quantity_yield: row.total_quantity_yield,
                profit_margin: row.profit_margin,
                ingredients: ingredients.remove(&row.id).unwrap_or_default(),
                fixed_costs: fixed_costs.remove(&row.id).unwrap_or_default(),
                created_at: row.created_at,
            })
            .collect())
    }
}
