use api_types::ErrorResponse;
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use engine::EngineError;

pub use server::{ServerState, router, run, run_with_listener, spawn_with_listener};

mod appointments;
mod expenses;
mod exports;
mod patients;
mod reports;
mod server;
mod upload;

pub mod types {
    pub mod patient {
        pub use api_types::patient::{FORM_FIELDS, PatientView};
        pub use engine::{Gender, Patient, PatientInput, Treatment};
    }

    pub mod expense {
        pub use api_types::expense::{ExpenseNew, ExpenseView};
        pub use engine::{Expense, ExpenseInput, ExpenseType};
    }

    pub mod appointment {
        pub use api_types::appointment::{AppointmentNew, AppointmentView};
        pub use engine::{AppointmentEntry, AppointmentInput, AppointmentStatus};
    }

    pub mod report {
        pub use api_types::report::{ExpenseReport, ExpenseReportQuery, OverviewReport};
    }
}

#[derive(Debug)]
pub enum ServerError {
    /// An engine failure while `action`-ing an `entity` (e.g. "creating",
    /// "Patient").
    Engine {
        entity: &'static str,
        action: &'static str,
        source: EngineError,
    },
    /// Rejected image upload.
    Upload(String),
    /// Malformed request (body, query or path).
    Generic(String),
}

impl ServerError {
    /// Wraps engine errors of a handler with what the handler was doing.
    pub(crate) fn context(
        entity: &'static str,
        action: &'static str,
    ) -> impl FnOnce(EngineError) -> ServerError {
        move |source| ServerError::Engine {
            entity,
            action,
            source,
        }
    }
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Validation(_) | EngineError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
        EngineError::Export(_) | EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::Export(reason) => {
            tracing::error!("export error: {reason}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, message, error) = match self {
            ServerError::Engine {
                entity,
                action,
                source,
            } => {
                let status = status_for_engine_error(&source);
                let message = if status == StatusCode::NOT_FOUND {
                    format!("{entity} not found")
                } else {
                    format!("Error {action} {}", entity.to_lowercase())
                };
                (status, message, message_for_engine_error(source))
            }
            ServerError::Upload(err) => {
                tracing::warn!("rejected upload: {err}");
                (StatusCode::BAD_REQUEST, "Error uploading image".to_string(), err)
            }
            ServerError::Generic(err) => {
                (StatusCode::BAD_REQUEST, "Invalid request".to_string(), err)
            }
        };

        (status, Json(ErrorResponse { message, error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine {
            entity: "Request",
            action: "handling",
            source: value,
        }
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(value: QueryRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

/// `Json` extractor whose rejections answer with an [`ErrorResponse`].
#[derive(axum::extract::FromRequest)]
#[from_request(via(axum::Json), rejection(ServerError))]
pub(crate) struct AppJson<T>(pub T);

/// `Query` extractor whose rejections answer with an [`ErrorResponse`].
#[derive(axum::extract::FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ServerError))]
pub(crate) struct AppQuery<T>(pub T);

pub(crate) fn parse_id(value: &str) -> Result<uuid::Uuid, ServerError> {
    uuid::Uuid::parse_str(value).map_err(|_| ServerError::Generic(format!("invalid id '{value}'")))
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    async fn body(res: axum::response::Response) -> ErrorResponse {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn engine_not_found_maps_to_404() {
        let err = ServerError::context("Patient", "updating")(EngineError::KeyNotFound(
            "x".to_string(),
        ));
        let res = err.into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body = body(res).await;
        assert_eq!(body.message, "Patient not found");
    }

    #[tokio::test]
    async fn engine_validation_maps_to_400() {
        let err = ServerError::context("Patient", "creating")(EngineError::Validation(
            "name is required".to_string(),
        ));
        let res = err.into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = body(res).await;
        assert_eq!(body.message, "Error creating patient");
        assert_eq!(body.error, "name is required");
    }

    #[test]
    fn engine_invalid_amount_maps_to_400() {
        let res = ServerError::from(EngineError::InvalidAmount("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn database_errors_are_hidden() {
        let err = EngineError::Database(sea_orm::DbErr::Custom("disk on fire".to_string()));
        let res = ServerError::from(err).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body(res).await.error, "internal server error");
    }

    #[test]
    fn upload_and_generic_map_to_400() {
        let res = ServerError::Upload("Only images are allowed".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
