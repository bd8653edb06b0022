//! Printable reports.
//!
//! Builders turn records and reports into a format-neutral [`Document`];
//! [`render_pdf`] and [`render_docx`] write it out.

use crate::{Expense, ExpenseType, Money, Patient, reports::OverviewReport, reports::sum_by_key};

mod docx;
mod pdf;

pub use docx::render_docx;
pub use pdf::render_pdf;

/// Rows shown per list in the overview document.
pub const OVERVIEW_ROWS: usize = 10;

/// Output format of an export.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Docx,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }

    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    pub fn render(self, document: &Document) -> crate::ResultEngine<Vec<u8>> {
        match self {
            Self::Pdf => render_pdf(document),
            Self::Docx => render_docx(document),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub title: String,
    pub sections: Vec<Section>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Section {
    Heading(String),
    /// Label / value pairs.
    Summary(Vec<(String, String)>),
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Paragraph(String),
}

fn strings<const N: usize>(values: [&str; N]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

/// "Dental Clinic Overview": summary figures plus the first patients and
/// expenses.
#[must_use]
pub fn overview_document(
    report: &OverviewReport,
    patients: &[Patient],
    expenses: &[Expense],
) -> Document {
    let summary = vec![
        ("Total Patients".to_string(), report.total_patients.to_string()),
        ("Total Earnings".to_string(), report.total_earnings.plain()),
        (
            "Total Appointments".to_string(),
            report.total_appointments.to_string(),
        ),
        ("Total Expenses".to_string(), report.total_expenses.plain()),
        ("Net Profit".to_string(), report.net_profit.plain()),
    ];

    let patient_rows = patients
        .iter()
        .take(OVERVIEW_ROWS)
        .map(|p| {
            vec![
                p.name.clone(),
                p.treatment
                    .map_or_else(|| "N/A".to_string(), |t| t.as_str().to_string()),
                p.registered_date.format("%Y-%m-%d").to_string(),
                p.contact_details.clone(),
            ]
        })
        .collect();

    let mut sections = vec![
        Section::Heading("Summary".to_string()),
        Section::Summary(summary),
        Section::Heading("Patients".to_string()),
        Section::Table {
            headers: strings(["Name", "Treatment", "Registered", "Contact"]),
            rows: patient_rows,
        },
        Section::Heading("Expenses".to_string()),
        Section::Table {
            headers: strings(["Type", "Amount", "Date", "Description"]),
            rows: expense_rows(expenses.iter().take(OVERVIEW_ROWS)),
        },
    ];
    if patients.len() > OVERVIEW_ROWS || expenses.len() > OVERVIEW_ROWS {
        sections.push(Section::Paragraph(format!(
            "Lists are limited to the first {OVERVIEW_ROWS} records."
        )));
    }

    Document {
        title: "Dental Clinic Overview".to_string(),
        sections,
    }
}

/// "Expenses Report": every given expense plus the total per type.
#[must_use]
pub fn expenses_document(expenses: &[Expense], filter_label: &str) -> Document {
    let by_type = sum_by_key(expenses, |e| e.expense_type, |e| e.amount);
    let total: Money = by_type.values().sum();
    let mut totals: Vec<(String, String)> = ExpenseType::ALL
        .iter()
        .filter_map(|t| by_type.get(t).map(|m| (t.as_str().to_string(), m.plain())))
        .collect();
    totals.push(("Total".to_string(), total.plain()));

    Document {
        title: "Expenses Report".to_string(),
        sections: vec![
            Section::Paragraph(format!(
                "Filter: {filter_label} ({} records)",
                expenses.len()
            )),
            Section::Heading("Expenses".to_string()),
            Section::Table {
                headers: strings(["Type", "Amount", "Date", "Description"]),
                rows: expense_rows(expenses.iter()),
            },
            Section::Heading("Totals by type".to_string()),
            Section::Summary(totals),
        ],
    }
}

fn expense_rows<'a>(expenses: impl Iterator<Item = &'a Expense>) -> Vec<Vec<String>> {
    expenses
        .map(|e| {
            vec![
                e.expense_type.as_str().to_string(),
                e.amount.plain(),
                e.date.format("%Y-%m-%d").to_string(),
                e.description.clone(),
            ]
        })
        .collect()
}
