use chrono::Utc;

use sea_orm::{PaginatorTrait, prelude::*};

use crate::{
    ExpenseType, ResultEngine,
    export::{self, ExportFormat},
    patients,
    reports::{self, ExpenseFilter, ExpenseReport, OverviewReport},
};

use super::Engine;

impl Engine {
    /// Totals shown on the Overview page, over every stored record.
    pub async fn overview_report(&self) -> ResultEngine<OverviewReport> {
        let patients = self.patients().await?;
        let appointments: Vec<_> = self
            .appointments()
            .await?
            .into_iter()
            .map(|entry| entry.appointment)
            .collect();
        let expenses = self.expenses().await?;
        Ok(reports::overview(
            &patients,
            &appointments,
            &expenses,
            self.appointment_fee,
        ))
    }

    /// Figures of the Reports page for the expenses matching `filter`.
    pub async fn expense_report(&self, filter: &ExpenseFilter) -> ResultEngine<ExpenseReport> {
        let expenses = self.expenses().await?;
        let total_patients = patients::Entity::find().count(&self.database).await?;
        Ok(reports::expense_report(
            &expenses,
            total_patients,
            filter,
            Utc::now(),
        ))
    }

    /// "Dental Clinic Overview" document rendered as `format`.
    pub async fn overview_export(&self, format: ExportFormat) -> ResultEngine<Vec<u8>> {
        let report = self.overview_report().await?;
        let patients = self.patients().await?;
        let expenses = self.expenses().await?;
        format.render(&export::overview_document(&report, &patients, &expenses))
    }

    /// "Expenses Report" document, optionally restricted to one type.
    pub async fn expenses_export(
        &self,
        format: ExportFormat,
        expense_type: Option<ExpenseType>,
    ) -> ResultEngine<Vec<u8>> {
        let expenses: Vec<_> = self
            .expenses()
            .await?
            .into_iter()
            .filter(|e| expense_type.is_none_or(|t| e.expense_type == t))
            .collect();
        let label = expense_type.map_or("All types", ExpenseType::as_str);
        format.render(&export::expenses_document(&expenses, label))
    }
}
