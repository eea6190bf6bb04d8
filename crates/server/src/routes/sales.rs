//! Sale route handlers.
//!
//! A sale is priced once, from the recipe metrics current at entry time.
//! Later recipe changes or deletion never touch stored totals.

use axum::{Json, extract::State};
use chrono::NaiveDate;
use serde::Deserialize;

use bakeledger_core::{
    PaymentMethod, RecipeId, Sale, SaleId, SaleQuantities, SaleTotals, price_sale,
};

use crate::db::{NumericColumn, SaleRepository};
use crate::db::sales::NewSale;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

use super::DeleteResponse;
use super::extract::{ApiJson, ApiPath};
use super::recipes::load_costing;
use super::validate::{bounded, non_negative, positive};

/// Body of `POST /api/sales`.
#[derive(Debug, Deserialize)]
pub struct CreateSaleRequest {
    pub recipe_id: RecipeId,
    pub sale_date: NaiveDate,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(flatten)]
    pub quantities: SaleQuantities,
}

impl CreateSaleRequest {
    /// Quantities rounded to their stored precision, so the totals are
    /// priced from exactly what gets recorded.
    fn validated_quantities(&self) -> Result<SaleQuantities> {
        let entered = self.quantities;
        Ok(SaleQuantities {
            quantity_sold: positive(
                "quantity_sold",
                entered.quantity_sold,
                NumericColumn::Quantity,
            )?,
            delivery_fee: non_negative("delivery_fee", entered.delivery_fee, NumericColumn::Money)?,
            delivery_cost: non_negative(
                "delivery_cost",
                entered.delivery_cost,
                NumericColumn::Money,
            )?,
        })
    }
}

fn storable_totals(totals: SaleTotals) -> Result<SaleTotals> {
    Ok(SaleTotals {
        total_revenue: bounded("total_revenue", totals.total_revenue, NumericColumn::Money)?,
        total_cost: bounded("total_cost", totals.total_cost, NumericColumn::Money)?,
        total_profit: bounded("total_profit", totals.total_profit, NumericColumn::Money)?,
    })
}

/// List all sales, most recent first.
///
/// GET /api/sales
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Vec<Sale>>> {
    let sales = SaleRepository::new(state.pool()).list().await?;
    Ok(Json(sales))
}

/// Price and record a sale.
///
/// POST /api/sales
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    ApiJson(body): ApiJson<CreateSaleRequest>,
) -> Result<Json<Sale>> {
    let quantities = body.validated_quantities()?;

    let costing = load_costing(&state, body.recipe_id).await?;
    let Some(metrics) = costing.metrics() else {
        let reason = costing
            .degraded_reason()
            .map_or_else(String::new, ToString::to_string);
        return Err(AppError::Degraded(format!(
            "recipe {} cannot be priced: {reason}",
            body.recipe_id
        )));
    };

    let totals = price_sale(metrics, quantities)
        .map_err(|e| AppError::BadRequest(format!("sale cannot be priced: {e}")))
        .and_then(storable_totals)?;

    let input = NewSale {
        recipe_id: body.recipe_id,
        recipe_name: costing.recipe().name.clone(),
        sale_date: body.sale_date,
        payment_method: body.payment_method,
        quantities,
        totals,
    };

    let sale = SaleRepository::new(state.pool()).create(&input).await?;
    tracing::info!(
        sale_id = %sale.id,
        recipe_id = %body.recipe_id,
        total_revenue = %sale.total_revenue,
        total_profit = %sale.total_profit,
        "sale recorded"
    );

    Ok(Json(sale))
}

/// Delete a sale.
///
/// DELETE /api/sales/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    ApiPath(id): ApiPath<SaleId>,
) -> Result<Json<DeleteResponse>> {
    let deleted = SaleRepository::new(state.pool()).delete(id).await?;
    Ok(Json(DeleteResponse { deleted }))
}
