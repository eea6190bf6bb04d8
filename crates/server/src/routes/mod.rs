//! HTTP route handlers for the JSON API.
//!
//! # Route Structure
//!
//! ```text
//! # Auth
//! POST   /api/register                - Create an account and log in
//! POST   /api/login                   - Log in
//! POST   /api/logout                  - Log out
//! GET    /api/check-auth              - Session status
//!
//! # Catalog (requires auth)
//! GET    /api/ingredients             - Ingredient list
//! POST   /api/ingredients             - Create ingredient
//! GET    /api/ingredients/{id}        - Ingredient
//! DELETE /api/ingredients/{id}        - Delete ingredient
//! GET    /api/recipes                 - Recipe list with metrics
//! POST   /api/recipes                 - Create recipe
//! GET    /api/recipes/{id}            - Recipe with metrics
//! DELETE /api/recipes/{id}            - Delete recipe
//!
//! # Ledger (requires auth)
//! GET    /api/operational-costs       - Operational cost list
//! POST   /api/operational-costs       - Log operational cost
//! DELETE /api/operational-costs/{id}  - Delete operational cost
//! GET    /api/sales                   - Sale list
//! POST   /api/sales                   - Record sale
//! DELETE /api/sales/{id}              - Delete sale
//!
//! # Reports (requires auth)
//! GET    /api/reports?start=&end=       - Period report (JSON)
//! GET    /api/reports/print?start=&end= - Period report (plain text)
//! ```

pub mod auth;
pub mod extract;
pub mod ingredients;
pub mod operational_costs;
pub mod recipes;
pub mod reports;
pub mod sales;
pub mod validate;

use axum::{
    Router,
    routing::{delete, get, post},
};
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

/// Response from every `DELETE` endpoint.
///
/// Deleting an ID that does not exist is not an error; `deleted` is `false`.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/check-auth", get(auth::check_auth))
}

/// Create the ingredient and recipe routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/ingredients",
            get(ingredients::index).post(ingredients::create),
        )
        .route(
            "/ingredients/{id}",
            get(ingredients::show).delete(ingredients::delete),
        )
        .route("/recipes", get(recipes::index).post(recipes::create))
        .route(
            "/recipes/{id}",
            get(recipes::show).delete(recipes::delete),
        )
}

/// Create the operational cost and sale routes router.
pub fn ledger_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/operational-costs",
            get(operational_costs::index).post(operational_costs::create),
        )
        .route(
            "/operational-costs/{id}",
            delete(operational_costs::delete),
        )
        .route("/sales", get(sales::index).post(sales::create))
        .route("/sales/{id}", delete(sales::delete))
}

/// Create the report routes router.
pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/reports", get(reports::show))
        .route("/reports/print", get(reports::print))
}

async fn api_not_found() -> AppError {
    AppError::NotFound("No such endpoint".to_string())
}

/// Create all routes served under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(catalog_routes())
        .merge(ledger_routes())
        .merge(report_routes())
        .fallback(api_not_found)
}
