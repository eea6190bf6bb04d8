//! Period report route handlers.
//!
//! Both endpoints take `?start=YYYY-MM-DD&end=YYYY-MM-DD`, inclusive on both
//! ends. `/api/reports` returns JSON; `/api/reports/print` renders the same
//! numbers as a plain-text sheet.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Json, extract::State};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::instrument;

use bakeledger_core::{
    CurrencyCode, DateRange, Money, NO_COSTS_LOGGED, OperationalCost, Report, Sale, aggregate,
};

use crate::db::{OperationalCostRepository, SaleRepository};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::state::AppState;

use super::extract::ApiQuery;

/// Response from `GET /api/reports`.
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    #[serde(flatten)]
    pub period: DateRange,
    pub sales: Vec<Sale>,
    pub costs: Vec<OperationalCost>,
    pub summary: Report,
    pub cost_breakdown_text: String,
}

/// A row of the printed cost breakdown.
#[derive(Debug)]
pub struct PrintedCost {
    pub date: NaiveDate,
    pub label: String,
    pub cost: Money,
}

/// Plain-text report sheet.
#[derive(Template, WebTemplate)]
#[template(path = "reports/print.txt")]
pub struct PrintReportTemplate {
    pub range: DateRange,
    pub total_revenue: Money,
    pub total_gross_profit: Money,
    pub total_operational_costs: Money,
    pub net_profit: Money,
    pub sales_count: usize,
    pub costs: Vec<PrintedCost>,
    pub no_costs: &'static str,
}

impl PrintReportTemplate {
    fn new(range: DateRange, report: &Report, currency: CurrencyCode) -> Self {
        let money = |amount| Money::new(amount, currency);
        Self {
            range,
            total_revenue: money(report.total_revenue),
            total_gross_profit: money(report.total_gross_profit),
            total_operational_costs: money(report.total_operational_costs),
            net_profit: money(report.net_profit),
            sales_count: report.sales_count,
            costs: report
                .cost_breakdown
                .iter()
                .map(|line| PrintedCost {
                    date: line.date,
                    label: line.label.clone(),
                    cost: money(line.cost),
                })
                .collect(),
            no_costs: NO_COSTS_LOGGED,
        }
    }
}

async fn load_period(
    state: &AppState,
    range: DateRange,
) -> Result<(Vec<Sale>, Vec<OperationalCost>)> {
    let sales = SaleRepository::new(state.pool());
    let costs = OperationalCostRepository::new(state.pool());

    let (sales, costs) = tokio::try_join!(sales.list_in_range(range), costs.list_in_range(range))?;
    Ok((sales, costs))
}

/// Aggregate sales and operational costs over a period.
///
/// GET /api/reports
#[instrument(skip(state, _user))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    ApiQuery(range): ApiQuery<DateRange>,
) -> Result<Json<ReportResponse>> {
    let (sales, costs) = load_period(&state, range).await?;

    let summary = aggregate(&sales, &costs).rounded();
    let cost_breakdown_text = summary.cost_breakdown_text(state.config().currency);

    Ok(Json(ReportResponse {
        period: range,
        sales,
        costs,
        summary,
        cost_breakdown_text,
    }))
}

/// Render the period report as plain text.
///
/// GET /api/reports/print
#[instrument(skip(state, _user))]
pub async fn print(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    ApiQuery(range): ApiQuery<DateRange>,
) -> Result<PrintReportTemplate> {
    let (sales, costs) = load_period(&state, range).await?;

    let report = aggregate(&sales, &costs).rounded();
    Ok(PrintReportTemplate::new(
        range,
        &report,
        state.config().currency,
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use bakeledger_core::{OperationalCostId, PaymentMethod, SaleId};

    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn sale(revenue: &str, profit: &str) -> Sale {
        Sale {
            id: SaleId::new(1),
            recipe_id: None,
            recipe_name: "Cake".to_string(),
            quantity_sold: Decimal::ONE,
            sale_date: date("2024-03-02"),
            payment_method: PaymentMethod::Cash,
            delivery_fee: Decimal::ZERO,
            delivery_cost: Decimal::ZERO,
            total_revenue: dec(revenue),
            total_cost: dec(revenue) - dec(profit),
            total_profit: dec(profit),
        }
    }

    fn cost(name: &str, amount: &str, day: &str) -> OperationalCost {
        OperationalCost {
            id: OperationalCostId::new(1),
            name: name.to_string(),
            cost: dec(amount),
            date_incurred: date(day),
        }
    }

    fn period_query(query: &str) -> std::result::Result<DateRange, String> {
        let uri: axum::http::Uri = format!("/api/reports?{query}").parse().unwrap();
        axum::extract::Query::<DateRange>::try_from_uri(&uri)
            .map(|axum::extract::Query(range)| range)
            .map_err(|rejection| rejection.body_text())
    }

    #[test]
    fn test_period_query_is_inclusive_range() {
        let range = period_query("start=2024-03-01&end=2024-03-31").unwrap();
        assert_eq!(range.start(), date("2024-03-01"));
        assert_eq!(range.end(), date("2024-03-31"));
    }

    #[test]
    fn test_inverted_period_query_is_rejected() {
        let err = period_query("start=2024-03-31&end=2024-03-01").unwrap_err();
        assert!(err.contains("is after period end"));
    }

    #[test]
    fn test_period_query_requires_both_dates() {
        assert!(period_query("start=2024-03-01").is_err());
    }

    #[test]
    fn test_print_sheet() {
        let report = aggregate(
            &[sale("150", "60")],
            &[cost("Rent", "30", "2024-03-01")],
        )
        .rounded();
        let range = DateRange::new(date("2024-03-01"), date("2024-03-31")).unwrap();

        let text = PrintReportTemplate::new(range, &report, CurrencyCode::BRL)
            .render()
            .unwrap();

        assert!(text.contains("Period: 2024-03-01 to 2024-03-31"));
        assert!(text.contains("R$ 150.00"));
        assert!(text.contains("NET PROFIT:           R$ 30.00"));
        assert!(text.contains("Sales recorded: 1"));
        assert!(text.contains("- 2024-03-01 | Rent            | R$ 30.00"));
        assert!(!text.contains(NO_COSTS_LOGGED));
    }

    #[test]
    fn test_print_sheet_without_costs() {
        let report = aggregate(&[], &[]).rounded();
        let range = DateRange::new(date("2024-03-01"), date("2024-03-01")).unwrap();

        let text = PrintReportTemplate::new(range, &report, CurrencyCode::BRL)
            .render()
            .unwrap();

        assert!(text.contains(NO_COSTS_LOGGED));
        assert!(text.contains("R$ 0.00"));
    }

    #[test]
    fn test_print_matches_json_breakdown() {
        let report = aggregate(
            &[],
            &[
                cost("Rent", "1200", "2024-03-01"),
                cost("Electricity", "89.9", "2024-03-10"),
            ],
        )
        .rounded();
        let range = DateRange::new(date("2024-03-01"), date("2024-03-31")).unwrap();

        let text = PrintReportTemplate::new(range, &report, CurrencyCode::BRL)
            .render()
            .unwrap();

        assert!(text.contains(&report.cost_breakdown_text(CurrencyCode::BRL)));
    }
}
