//! Database operations for the ledger `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `users` - Login accounts and password hashes
//! - `tower_sessions.session` - Tower-sessions storage
//! - `ingredients` - Purchasable ingredients and their current cost
//! - `recipes` - Recipe header (name, yield, margin)
//! - `recipe_ingredient_line` - Frozen ingredient snapshots per recipe
//! - `recipe_fixed_cost_line` - Fixed-cost lines per recipe
//! - `operational_costs` - Period overhead
//! - `sales` - Recorded sales with frozen totals
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p bakeledger-cli -- migrate
//! ```

pub mod ingredients;
pub mod operational_costs;
pub mod recipes;
pub mod sales;
pub mod users;

use std::time::Duration;

use rust_decimal::{Decimal, RoundingStrategy};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use ingredients::IngredientRepository;
pub use operational_costs::OperationalCostRepository;
pub use recipes::RecipeRepository;
pub use sales::SaleRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// A unique constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Input referenced a missing row or produced an unstorable value.
    #[error("invalid input: {0}")]
    Invalid(String),
}

impl RepositoryError {
    /// Map a unique violation to `Conflict`, anything else to `Database`.
    pub(crate) fn from_unique_violation(err: sqlx::Error, message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return Self::Conflict(message.to_owned());
        }
        Self::Database(err)
    }
}

/// Precision of the `NUMERIC` columns that hold amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericColumn {
    /// `NUMERIC(10,2)`: costs, fees, line costs and sale totals.
    Money,
    /// `NUMERIC(12,4)`: yields and quantities.
    Quantity,
    /// `NUMERIC(7,2)`: profit margins.
    Margin,
}

impl NumericColumn {
    /// Decimal places the column keeps.
    #[must_use]
    pub const fn scale(self) -> u32 {
        match self {
            Self::Money | Self::Margin => 2,
            Self::Quantity => 4,
        }
    }

    /// Largest magnitude the column can store.
    #[must_use]
    pub fn max(self) -> Decimal {
        match self {
            Self::Money => Decimal::new(9_999_999_999, 2),
            Self::Quantity => Decimal::new(999_999_999_999, 4),
            Self::Margin => Decimal::new(9_999_999, 2),
        }
    }

    /// Round `value` the way Postgres does on insert, or `None` if the
    /// rounded value does not fit.
    #[must_use]
    pub fn fit(self, value: Decimal) -> Option<Decimal> {
        let mut rounded =
            value.round_dp_with_strategy(self.scale(), RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(self.scale());
        (rounded.abs() <= self.max()).then_some(rounded)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_column_bounds() {
        assert_eq!(NumericColumn::Money.fit(dec("99999999.99")), Some(dec("99999999.99")));
        assert_eq!(NumericColumn::Money.fit(dec("99999999.995")), None);
        assert_eq!(NumericColumn::Money.fit(dec("1000000000")), None);
        assert_eq!(NumericColumn::Margin.fit(dec("99999.99")), Some(dec("99999.99")));
        assert_eq!(NumericColumn::Margin.fit(dec("100000")), None);
        assert_eq!(NumericColumn::Margin.fit(dec("-99999.99")), Some(dec("-99999.99")));
        assert_eq!(
            NumericColumn::Quantity.fit(dec("99999999.9999")),
            Some(dec("99999999.9999"))
        );
        assert_eq!(NumericColumn::Quantity.fit(dec("100000000")), None);
    }

    #[test]
    fn test_fit_rounds_to_scale() {
        assert_eq!(NumericColumn::Money.fit(dec("0.005")).unwrap().to_string(), "0.01");
        assert_eq!(NumericColumn::Money.fit(dec("3")).unwrap().to_string(), "3.00");
        assert_eq!(NumericColumn::Quantity.fit(dec("0.12345")), Some(dec("0.1235")));
    }
}
