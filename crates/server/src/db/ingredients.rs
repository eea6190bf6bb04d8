//! Ingredient repository.

use rust_decimal::Decimal;
use sqlx::PgPool;

use bakeledger_core::{Ingredient, IngredientId, round_money};

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
pub(super) struct IngredientRow {
    id: i32,
    name: String,
    cost: Decimal,
    unit: String,
}

impl From<IngredientRow> for Ingredient {
    fn from(row: IngredientRow) -> Self {
        Self {
            id: IngredientId::new(row.id),
            name: row.name,
            cost: row.cost,
            unit: row.unit,
        }
    }
}

/// Fields for a new ingredient.
#[derive(Debug, Clone)]
pub struct NewIngredient {
    pub name: String,
    pub cost: Decimal,
    pub unit: String,
}

/// Repository for ingredient database operations.
pub struct IngredientRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> IngredientRepository<'a> {
    /// Create a new ingredient repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all ingredients ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Ingredient>, RepositoryError> {
        let rows = sqlx::query_as::<_, IngredientRow>(
            "SELECT id, name, cost, unit FROM ingredients ORDER BY name ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get an ingredient by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: IngredientId) -> Result<Option<Ingredient>, RepositoryError> {
        let row = sqlx::query_as::<_, IngredientRow>(
            "SELECT id, name, cost, unit FROM ingredients WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create an ingredient. The cost is stored rounded to cents.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, input: &NewIngredient) -> Result<Ingredient, RepositoryError> {
        let row = sqlx::query_as::<_, IngredientRow>(
            r"
            INSERT INTO ingredients (name, cost, unit)
            VALUES ($1, $2, $3)
            RETURNING id, name, cost, unit
            ",
        )
        .bind(&input.name)
        .bind(round_money(input.cost))
        .bind(&input.unit)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_unique_violation(e, "ingredient name already exists"))?;

        Ok(row.into())
    }

    /// Delete an ingredient.
    ///
    /// Recipe lines keep their snapshot; only their `ingredient_id` is cleared.
    ///
    /// # Returns
    ///
    /// `true` if a row was deleted, `false` if the ID did not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: IngredientId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM ingredients WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
