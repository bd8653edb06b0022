use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Plain confirmation body (e.g. `{"message": "Patient deleted"}`).
#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

/// Body returned by every failed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// What the server was doing (e.g. "Error creating patient").
    pub message: String,
    /// Underlying cause, safe to show to the user.
    pub error: String,
}

pub mod patient {
    use super::*;

    /// Multipart text fields accepted by `POST/PUT /api/patients`.
    ///
    /// The file itself travels in the `image` part.
    pub const FORM_FIELDS: [&str; 10] = [
        "name",
        "dob",
        "gender",
        "address",
        "contact_details",
        "city",
        "treatment",
        "fees",
        "registered_date",
        "appointment_date",
    ];

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct PatientView {
        pub id: Uuid,
        pub name: String,
        pub dob: NaiveDate,
        pub gender: String,
        /// Derived from `dob` on every save.
        pub age: u32,
        pub address: String,
        pub contact_details: String,
        pub city: Option<String>,
        pub treatment: Option<String>,
        pub fees_minor: i64,
        pub registered_date: NaiveDate,
        pub appointment_date: Option<DateTime<Utc>>,
        /// Stored filename, served from `/uploads/{image}`.
        pub image: Option<String>,
        pub date_added: DateTime<Utc>,
    }
}

pub mod expense {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        #[serde(rename = "type")]
        pub expense_type: String,
        pub description: String,
        /// Must be >= 0.
        pub amount_minor: i64,
        /// Optional: if absent, server uses now().
        pub date: Option<DateTime<FixedOffset>>,
        pub category: Option<String>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        #[serde(rename = "type")]
        pub expense_type: String,
        pub description: String,
        pub amount_minor: i64,
        pub date: DateTime<Utc>,
        pub category: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod appointment {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct AppointmentNew {
        pub patient_id: Uuid,
        pub date: DateTime<FixedOffset>,
        pub treatment: String,
        /// One of `Pending`, `Confirmed`, `Completed`, `Cancelled`.
        /// Defaults to `Pending`.
        pub status: Option<String>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct AppointmentView {
        pub id: Uuid,
        pub patient_id: Uuid,
        /// `None` when the referenced patient no longer exists.
        pub patient_name: Option<String>,
        pub date: DateTime<Utc>,
        pub treatment: String,
        pub status: String,
    }
}

pub mod report {
    use super::*;

    use crate::expense::ExpenseView;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct AmountByKey {
        pub key: String,
        pub amount_minor: i64,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct OverviewReport {
        pub total_patients: u64,
        pub total_appointments: u64,
        pub total_expenses_minor: i64,
        pub total_earnings_minor: i64,
        pub net_profit_minor: i64,
        /// Appointment count per calendar month, January first.
        pub appointments_by_month: Vec<u64>,
        /// One entry per expense type, in declaration order.
        pub expenses_by_type: Vec<AmountByKey>,
        pub expenses_by_category: Vec<AmountByKey>,
    }

    /// Query string of `GET /api/reports/expenses`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseReportQuery {
        /// `all` (default), `week`, `month` or `year`.
        pub range: Option<String>,
        pub search: Option<String>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct CategoryShare {
        pub category: String,
        pub amount_minor: i64,
        pub percentage: f64,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct MonthlyBucket {
        /// Calendar month, 1-12.
        pub month: u32,
        pub label: String,
        pub count: u64,
        pub amount_minor: i64,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct ExpenseReport {
        pub range: String,
        pub search: Option<String>,
        pub total_expenses_minor: i64,
        pub total_patients: u64,
        pub average_per_patient_minor: i64,
        pub by_category: Vec<CategoryShare>,
        pub dental_percentage: f64,
        pub monthly: Vec<MonthlyBucket>,
        pub top_categories: Vec<CategoryShare>,
        pub recent: Vec<ExpenseView>,
    }

    /// Query string of `GET /api/exports/expenses.{pdf,docx}`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseExportQuery {
        #[serde(rename = "type")]
        pub expense_type: Option<String>,
    }
}
