//! Sale repository.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use bakeledger_core::{
    DateRange, PaymentMethod, RecipeId, Sale, SaleId, SaleQuantities, SaleTotals, round_money,
};

use super::RepositoryError;

const SALE_COLUMNS: &str = r"
    id, recipe_id, recipe_name, quantity_sold, sale_date, payment_method,
    delivery_fee, delivery_cost, total_revenue, total_cost, total_profit
";

#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: i32,
    recipe_id: Option<i32>,
    recipe_name: String,
    quantity_sold: Decimal,
    sale_date: NaiveDate,
    payment_method: String,
    delivery_fee: Decimal,
    delivery_cost: Decimal,
    total_revenue: Decimal,
    total_cost: Decimal,
    total_profit: Decimal,
}

impl TryFrom<SaleRow> for Sale {
    type Error = RepositoryError;

    fn try_from(row: SaleRow) -> Result<Self, Self::Error> {
        let payment_method = row.payment_method.parse::<PaymentMethod>().map_err(|e| {
            RepositoryError::DataCorruption(format!("sale {}: {e}", row.id))
        })?;

        Ok(Self {
            id: SaleId::new(row.id),
            recipe_id: row.recipe_id.map(RecipeId::new),
            recipe_name: row.recipe_name,
            quantity_sold: row.quantity_sold,
            sale_date: row.sale_date,
            payment_method,
            delivery_fee: row.delivery_fee,
            delivery_cost: row.delivery_cost,
            total_revenue: row.total_revenue,
            total_cost: row.total_cost,
            total_profit: row.total_profit,
        })
    }
}

fn into_sales(rows: Vec<SaleRow>) -> Result<Vec<Sale>, RepositoryError> {
    rows.into_iter().map(Sale::try_from).collect()
}

/// A priced sale ready to be stored.
#[derive(Debug, Clone)]
pub struct NewSale {
    pub recipe_id: RecipeId,
    pub recipe_name: String,
    pub sale_date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub quantities: SaleQuantities,
    pub totals: SaleTotals,
}

/// Repository for sale database operations.
pub struct SaleRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SaleRepository<'a> {
    /// Create a new sale repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all sales, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored payment method is unknown.
    pub async fn list(&self) -> Result<Vec<Sale>, RepositoryError> {
        let rows = sqlx::query_as::<_, SaleRow>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales ORDER BY sale_date DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        into_sales(rows)
    }

    /// List sales made within a period, both ends included.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored payment method is unknown.
    pub async fn list_in_range(&self, range: DateRange) -> Result<Vec<Sale>, RepositoryError> {
        let rows = sqlx::query_as::<_, SaleRow>(&format!(
            r"
            SELECT {SALE_COLUMNS}
            FROM sales
            WHERE sale_date BETWEEN $1 AND $2
            ORDER BY sale_date ASC, id ASC
            "
        ))
        .bind(range.start())
        .bind(range.end())
        .fetch_all(self.pool)
        .await?;

        into_sales(rows)
    }

    /// Store a priced sale.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Invalid` if the recipe was deleted meanwhile.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, input: &NewSale) -> Result<Sale, RepositoryError> {
        let row = sqlx::query_as::<_, SaleRow>(&format!(
            r"
            INSERT INTO sales (
                recipe_id, recipe_name, quantity_sold, sale_date, payment_method,
                delivery_fee, delivery_cost, total_revenue, total_cost, total_profit
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {SALE_COLUMNS}
            "
        ))
        .bind(input.recipe_id)
        .bind(&input.recipe_name)
        .bind(input.quantities.quantity_sold)
        .bind(input.sale_date)
        .bind(input.payment_method.as_str())
        .bind(round_money(input.quantities.delivery_fee))
        .bind(round_money(input.quantities.delivery_cost))
        .bind(input.totals.total_revenue)
        .bind(input.totals.total_cost)
        .bind(input.totals.total_profit)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::Invalid(format!("unknown recipe {}", input.recipe_id));
            }
            RepositoryError::Database(e)
        })?;

        row.try_into()
    }

    /// Delete a sale.
    ///
    /// # Returns
    ///
    /// `true` if a row was deleted, `false` if the ID did not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: SaleId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM sales WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
