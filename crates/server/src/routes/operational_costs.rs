//! Operational cost route handlers.

use axum::{Json, extract::State};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use bakeledger_core::{OperationalCost, OperationalCostId};

use crate::db::{NumericColumn, OperationalCostRepository};
use crate::db::operational_costs::NewOperationalCost;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::state::AppState;

use super::DeleteResponse;
use super::extract::{ApiJson, ApiPath};
use super::validate::{non_negative, required_text};

/// Body of `POST /api/operational-costs`.
#[derive(Debug, Deserialize)]
pub struct CreateOperationalCostRequest {
    pub name: String,
    pub cost: Decimal,
    pub date_incurred: NaiveDate,
}

impl CreateOperationalCostRequest {
    fn validate(self) -> Result<NewOperationalCost> {
        Ok(NewOperationalCost {
            name: required_text("name", &self.name)?,
            cost: non_negative("cost", self.cost, NumericColumn::Money)?,
            date_incurred: self.date_incurred,
        })
    }
}

/// List operational costs, most recent first.
///
/// GET /api/operational-costs
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Vec<OperationalCost>>> {
    let costs = OperationalCostRepository::new(state.pool()).list().await?;
    Ok(Json(costs))
}

/// Record an operational cost.
///
/// POST /api/operational-costs
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    ApiJson(body): ApiJson<CreateOperationalCostRequest>,
) -> Result<Json<OperationalCost>> {
    let input = body.validate()?;

    let cost = OperationalCostRepository::new(state.pool())
        .create(&input)
        .await?;
    tracing::info!(operational_cost_id = %cost.id, "operational cost recorded");

    Ok(Json(cost))
}

/// Delete an operational cost. Deleting a missing ID is not an error.
///
/// DELETE /api/operational-costs/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    ApiPath(id): ApiPath<OperationalCostId>,
) -> Result<Json<DeleteResponse>> {
    let deleted = OperationalCostRepository::new(state.pool())
        .delete(id)
        .await?;
    Ok(Json(DeleteResponse { deleted }))
}
