//! Report API endpoints

use api_types::report::{
    AmountByKey, CategoryShare, ExpenseReport, ExpenseReportQuery, MonthlyBucket, OverviewReport,
};
use axum::{Json, extract::State};
use engine::{
    Money,
    reports::{self, ExpenseFilter, TimeRange},
};

use crate::{AppQuery, ServerError, expenses, server::ServerState};

fn amount_by_key(key: &str, amount: Money) -> AmountByKey {
    AmountByKey {
        key: key.to_string(),
        amount_minor: amount.minor(),
    }
}

fn share(share: &reports::CategoryShare) -> CategoryShare {
    CategoryShare {
        category: share.category.clone(),
        amount_minor: share.amount.minor(),
        percentage: share.percentage,
    }
}

fn overview_view(report: &reports::OverviewReport) -> OverviewReport {
    OverviewReport {
        total_patients: report.total_patients,
        total_appointments: report.total_appointments,
        total_expenses_minor: report.total_expenses.minor(),
        total_earnings_minor: report.total_earnings.minor(),
        net_profit_minor: report.net_profit.minor(),
        appointments_by_month: report.appointments_by_month.to_vec(),
        expenses_by_type: report
            .expenses_by_type
            .iter()
            .map(|(t, amount)| amount_by_key(t.as_str(), *amount))
            .collect(),
        expenses_by_category: report
            .expenses_by_category
            .iter()
            .map(|(c, amount)| amount_by_key(c, *amount))
            .collect(),
    }
}

fn expense_report_view(report: &reports::ExpenseReport) -> ExpenseReport {
    ExpenseReport {
        range: report.filter.range.as_str().to_string(),
        search: report.filter.search.clone(),
        total_expenses_minor: report.total_expenses.minor(),
        total_patients: report.total_patients,
        average_per_patient_minor: report.average_per_patient.minor(),
        by_category: report.by_category.iter().map(share).collect(),
        dental_percentage: report.dental_percentage,
        monthly: report
            .monthly
            .iter()
            .map(|m| MonthlyBucket {
                month: m.month,
                label: m.label.to_string(),
                count: m.count,
                amount_minor: m.amount.minor(),
            })
            .collect(),
        top_categories: report.top_categories.iter().map(share).collect(),
        recent: report.recent.iter().map(expenses::view).collect(),
    }
}

/// Handle requests for the Overview page figures
pub async fn overview(State(state): State<ServerState>) -> Result<Json<OverviewReport>, ServerError> {
    let report = state
        .engine
        .overview_report()
        .await
        .map_err(ServerError::context("Report", "building"))?;
    Ok(Json(overview_view(&report)))
}

/// Handle requests for the Reports page figures
pub async fn expenses(
    State(state): State<ServerState>,
    AppQuery(query): AppQuery<ExpenseReportQuery>,
) -> Result<Json<ExpenseReport>, ServerError> {
    let range = match query.range.as_deref().map(str::trim) {
        None | Some("") => TimeRange::default(),
        Some(raw) => TimeRange::try_from(raw).map_err(ServerError::context("Report", "building"))?,
    };
    let filter = ExpenseFilter {
        range,
        search: query.search.filter(|s| !s.trim().is_empty()),
    };
    let report = state
        .engine
        .expense_report(&filter)
        .await
        .map_err(ServerError::context("Report", "building"))?;
    Ok(Json(expense_report_view(&report)))
}
