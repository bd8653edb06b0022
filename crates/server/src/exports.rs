//! Document downloads: `overview.{pdf,docx}` and `expenses.{pdf,docx}`.

use api_types::report::ExpenseExportQuery;
use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use engine::{ExpenseType, export::ExportFormat};

use crate::{AppQuery, ServerError, server::ServerState};

#[derive(Debug, PartialEq)]
enum Export {
    Overview,
    Expenses,
}

impl Export {
    const fn download_name(&self) -> &'static str {
        match self {
            Self::Overview => "Dental_Clinic_Overview",
            Self::Expenses => "Expenses_Report",
        }
    }
}

fn parse_file(file: &str) -> Option<(Export, ExportFormat)> {
    let (stem, ext) = file.rsplit_once('.')?;
    let export = match stem {
        "overview" => Export::Overview,
        "expenses" => Export::Expenses,
        _ => return None,
    };
    Some((export, ExportFormat::from_extension(ext)?))
}

pub async fn download(
    State(state): State<ServerState>,
    Path(file): Path<String>,
    AppQuery(query): AppQuery<ExpenseExportQuery>,
) -> Result<Response, ServerError> {
    let (export, format) = parse_file(&file)
        .ok_or_else(|| ServerError::Generic(format!("unknown export '{file}'")))?;

    let bytes = match export {
        Export::Overview => state
            .engine
            .overview_export(format)
            .await
            .map_err(ServerError::context("Export", "generating"))?,
        Export::Expenses => {
            let expense_type = query
                .expense_type
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty() && !t.eq_ignore_ascii_case("all"))
                .map(ExpenseType::try_from)
                .transpose()
                .map_err(ServerError::context("Export", "generating"))?;
            state
                .engine
                .expenses_export(format, expense_type)
                .await
                .map_err(ServerError::context("Export", "generating"))?
        }
    };

    tracing::debug!("exported {file} ({} bytes)", bytes.len());
    let disposition = format!(
        "attachment; filename=\"{}.{}\"",
        export.download_name(),
        format.extension()
    );
    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names() {
        assert_eq!(
            parse_file("overview.pdf"),
            Some((Export::Overview, ExportFormat::Pdf))
        );
        assert_eq!(
            parse_file("expenses.DOCX"),
            Some((Export::Expenses, ExportFormat::Docx))
        );
        assert_eq!(parse_file("expenses"), None);
        assert_eq!(parse_file("patients.pdf"), None);
        assert_eq!(parse_file("overview.txt"), None);
    }
}
