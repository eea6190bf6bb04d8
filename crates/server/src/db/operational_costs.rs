//! Operational cost repository.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use bakeledger_core::{DateRange, OperationalCost, OperationalCostId, round_money};

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct OperationalCostRow {
    id: i32,
    name: String,
    cost: Decimal,
    date_incurred: NaiveDate,
}

impl From<OperationalCostRow> for OperationalCost {
    fn from(row: OperationalCostRow) -> Self {
        Self {
            id: OperationalCostId::new(row.id),
            name: row.name,
            cost: row.cost,
            date_incurred: row.date_incurred,
        }
    }
}

/// Fields for a new operational cost.
#[derive(Debug, Clone)]
pub struct NewOperationalCost {
    pub name: String,
    pub cost: Decimal,
    pub date_incurred: NaiveDate,
}

/// Repository for operational cost database operations.
pub struct OperationalCostRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OperationalCostRepository<'a> {
    /// Create a new operational cost repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all operational costs, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<OperationalCost>, RepositoryError> {
        let rows = sqlx::query_as::<_, OperationalCostRow>(
            r"
            SELECT id, name, cost, date_incurred
            FROM operational_costs
            ORDER BY date_incurred DESC, id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List operational costs incurred within a period, both ends included.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_in_range(
        &self,
        range: DateRange,
    ) -> Result<Vec<OperationalCost>, RepositoryError> {
        let rows = sqlx::query_as::<_, OperationalCostRow>(
            r"
            SELECT id, name, cost, date_incurred
            FROM operational_costs
            WHERE date_incurred BETWEEN $1 AND $2
            ORDER BY date_incurred ASC, id ASC
            ",
        )
        .bind(range.start())
        .bind(range.end())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Record an operational cost. The amount is stored rounded to cents.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        input: &NewOperationalCost,
    ) -> Result<OperationalCost, RepositoryError> {
        let row = sqlx::query_as::<_, OperationalCostRow>(
            r"
            INSERT INTO operational_costs (name, cost, date_incurred)
            VALUES ($1, $2, $3)
            RETURNING id, name, cost, date_incurred
            ",
        )
        .bind(&input.name)
        .bind(round_money(input.cost))
        .bind(input.date_incurred)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Delete an operational cost.
    ///
    /// # Returns
    ///
    /// `true` if a row was deleted, `false` if the ID did not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: OperationalCostId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM operational_costs WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
