use std::path::{Path, PathBuf};

use api_types::{
    ErrorResponse, Message,
    appointment::{AppointmentNew, AppointmentView},
    expense::{ExpenseNew, ExpenseView},
    patient::PatientView,
    report::{ExpenseReport, OverviewReport},
};
use engine::export::ExportFormat;
use reqwest::{
    RequestBuilder, StatusCode, Url,
    multipart::{Form, Part},
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::{AppError, Result};

#[derive(Debug)]
pub enum ClientError {
    NotFound(String),
    Validation(String),
    Server(String),
    Transport(reqwest::Error),
    /// The local image picked for upload could not be read.
    File(std::io::Error),
}

impl ClientError {
    /// Text shown in the error toast.
    pub fn message(&self) -> String {
        match self {
            Self::NotFound(message) | Self::Validation(message) => message.clone(),
            Self::Server(message) => format!("Server error: {message}"),
            Self::Transport(err) => format!("Server unreachable: {err}"),
            Self::File(err) => format!("Cannot read image: {err}"),
        }
    }
}

fn error_for_status(status: StatusCode, body: Option<ErrorResponse>) -> ClientError {
    let message = body
        .map(|body| {
            if body.error.is_empty() || body.error == body.message {
                body.message
            } else {
                format!("{}: {}", body.message, body.error)
            }
        })
        .unwrap_or_else(|| "unknown error".to_string());

    match status.as_u16() {
        404 => ClientError::NotFound(message),
        400 | 413 | 422 => ClientError::Validation(message),
        _ => ClientError::Server(message),
    }
}

/// Multipart body of a patient create or update.
#[derive(Debug, Default)]
pub struct PatientUpload {
    pub fields: Vec<(&'static str, String)>,
    /// Local file sent as the `image` part.
    pub image_file: Option<PathBuf>,
}

/// Which report `GET /api/exports/...` should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Overview,
    Expenses,
}

impl ExportKind {
    fn stem(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Expenses => "expenses",
        }
    }

    /// Name the downloaded document is saved under.
    pub fn file_name(self, format: ExportFormat) -> String {
        let base = match self {
            Self::Overview => "Dental_Clinic_Overview",
            Self::Expenses => "Expenses_Report",
        };
        format!("{base}.{}", format.extension())
    }
}

fn image_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

type ClientResult<T> = std::result::Result<T, ClientError>;

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| AppError::invalid_setting("base_url", err))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::Server(format!("invalid base_url: {err}")))
    }

    async fn send(&self, request: RequestBuilder) -> ClientResult<reqwest::Response> {
        let res = request.send().await.map_err(ClientError::Transport)?;
        if res.status().is_success() {
            return Ok(res);
        }
        let status = res.status();
        let body = res.json::<ErrorResponse>().await.ok();
        Err(error_for_status(status, body))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(ClientError::Transport)
    }

    pub async fn patients(&self) -> ClientResult<Vec<PatientView>> {
        let endpoint = self.endpoint("api/patients")?;
        self.send_json(self.http.get(endpoint)).await
    }

    async fn patient_form(upload: PatientUpload) -> ClientResult<Form> {
        let mut form = Form::new();
        for (key, value) in upload.fields {
            form = form.text(key, value);
        }
        if let Some(path) = upload.image_file {
            let bytes = tokio::fs::read(&path).await.map_err(ClientError::File)?;
            let file_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("image")
                .to_string();
            let part = Part::bytes(bytes)
                .file_name(file_name)
                .mime_str(image_mime(&path))
                .map_err(ClientError::Transport)?;
            form = form.part("image", part);
        }
        Ok(form)
    }

    pub async fn create_patient(&self, upload: PatientUpload) -> ClientResult<PatientView> {
        let endpoint = self.endpoint("api/patients")?;
        let form = Self::patient_form(upload).await?;
        self.send_json(self.http.post(endpoint).multipart(form))
            .await
    }

    pub async fn update_patient(
        &self,
        id: Uuid,
        upload: PatientUpload,
    ) -> ClientResult<PatientView> {
        let endpoint = self.endpoint(&format!("api/patients/{id}"))?;
        let form = Self::patient_form(upload).await?;
        self.send_json(self.http.put(endpoint).multipart(form)).await
    }

    pub async fn delete_patient(&self, id: Uuid) -> ClientResult<Message> {
        let endpoint = self.endpoint(&format!("api/patients/{id}"))?;
        self.send_json(self.http.delete(endpoint)).await
    }

    pub async fn expenses(&self) -> ClientResult<Vec<ExpenseView>> {
        let endpoint = self.endpoint("api/expenses")?;
        self.send_json(self.http.get(endpoint)).await
    }

    pub async fn create_expense(&self, payload: &ExpenseNew) -> ClientResult<ExpenseView> {
        let endpoint = self.endpoint("api/expenses")?;
        self.send_json(self.http.post(endpoint).json(payload)).await
    }

    pub async fn update_expense(
        &self,
        id: Uuid,
        payload: &ExpenseNew,
    ) -> ClientResult<ExpenseView> {
        let endpoint = self.endpoint(&format!("api/expenses/{id}"))?;
        self.send_json(self.http.put(endpoint).json(payload)).await
    }

    pub async fn delete_expense(&self, id: Uuid) -> ClientResult<Message> {
        let endpoint = self.endpoint(&format!("api/expenses/{id}"))?;
        self.send_json(self.http.delete(endpoint)).await
    }

    pub async fn appointments(&self) -> ClientResult<Vec<AppointmentView>> {
        let endpoint = self.endpoint("api/appointments")?;
        self.send_json(self.http.get(endpoint)).await
    }

    pub async fn create_appointment(
        &self,
        payload: &AppointmentNew,
    ) -> ClientResult<AppointmentView> {
        let endpoint = self.endpoint("api/appointments")?;
        self.send_json(self.http.post(endpoint).json(payload)).await
    }

    pub async fn update_appointment(
        &self,
        id: Uuid,
        payload: &AppointmentNew,
    ) -> ClientResult<AppointmentView> {
        let endpoint = self.endpoint(&format!("api/appointments/{id}"))?;
        self.send_json(self.http.put(endpoint).json(payload)).await
    }

    pub async fn delete_appointment(&self, id: Uuid) -> ClientResult<Message> {
        let endpoint = self.endpoint(&format!("api/appointments/{id}"))?;
        self.send_json(self.http.delete(endpoint)).await
    }

    pub async fn overview(&self) -> ClientResult<OverviewReport> {
        let endpoint = self.endpoint("api/reports/overview")?;
        self.send_json(self.http.get(endpoint)).await
    }

    pub async fn expense_report(&self, range: &str, search: &str) -> ClientResult<ExpenseReport> {
        let mut endpoint = self.endpoint("api/reports/expenses")?;
        {
            let mut query = endpoint.query_pairs_mut();
            query.append_pair("range", range);
            if !search.trim().is_empty() {
                query.append_pair("search", search.trim());
            }
        }
        self.send_json(self.http.get(endpoint)).await
    }

    /// Downloads a rendered report; `expense_type` only applies to
    /// [`ExportKind::Expenses`].
    pub async fn export(
        &self,
        kind: ExportKind,
        format: ExportFormat,
        expense_type: Option<&str>,
    ) -> ClientResult<Vec<u8>> {
        let mut endpoint =
            self.endpoint(&format!("api/exports/{}.{}", kind.stem(), format.extension()))?;
        if let (ExportKind::Expenses, Some(expense_type)) = (kind, expense_type) {
            endpoint
                .query_pairs_mut()
                .append_pair("type", expense_type);
        }
        let res = self.send(self.http.get(endpoint)).await?;
        let bytes = res.bytes().await.map_err(ClientError::Transport)?;
        Ok(bytes.to_vec())
    }
}
