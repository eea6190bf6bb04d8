//! Bakeledger Core - Shared types and calculations.
//!
//! This crate provides the domain model used across all Bakeledger components:
//! - `server` - JSON API for ingredients, recipes, costs, sales and reports
//! - `cli` - Command-line tools for migrations and user management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. Every calculation operates on fully materialized records.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, money, usernames, payment methods and date ranges
//! - [`catalog`] - Ingredients, recipes and their frozen line items
//! - [`ledger`] - Operational costs and sales
//! - [`costing`] - Recipe cost and suggested price calculation
//! - [`pricing`] - Sale snapshot pricing
//! - [`report`] - Period profit report aggregation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod costing;
pub mod ledger;
pub mod pricing;
pub mod report;
pub mod types;

pub use catalog::{FixedCostLine, Ingredient, IngredientLine, Recipe};
pub use costing::{
    CostBreakdown, CostingError, DegradedRecipe, RecipeCosting, RecipeMetrics, RecipeWithMetrics,
    compute_metrics,
};
pub use ledger::{OperationalCost, Sale};
pub use pricing::{SaleQuantities, SaleTotals, price_sale};
pub use report::{CostBreakdownLine, NO_COSTS_LOGGED, Report, aggregate};
pub use types::*;
