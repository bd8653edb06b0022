use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{Datelike, Duration, Utc};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use engine::{Engine, Money};
use server::ServerState;

const BOUNDARY: &str = "clinic-test-boundary";

async fn app() -> (Router, TempDir) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db)
        .appointment_fee(Money::new(50_000))
        .build()
        .await
        .unwrap();
    let uploads = tempfile::tempdir().unwrap();
    let state = ServerState {
        engine: Arc::new(engine),
        upload_dir: Arc::new(uploads.path().to_path_buf()),
    };
    (server::router(state), uploads)
}

struct FilePart<'a> {
    file_name: &'a str,
    content_type: &'a str,
    bytes: &'a [u8],
}

fn multipart_body(fields: &[(&str, &str)], file: Option<FilePart<'_>>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(file) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.file_name, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_request(method: &str, uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, req).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn twenty_years_ago() -> String {
    let today = Utc::now().date_naive();
    today
        .with_year(today.year() - 20)
        .unwrap_or(today - Duration::days(7305))
        .format("%Y-%m-%d")
        .to_string()
}

fn patient_fields(dob: &str) -> Vec<(&'static str, String)> {
    vec![
        ("name", "Priya Shah".to_string()),
        ("dob", dob.to_string()),
        ("gender", "Female".to_string()),
        ("address", "22 Hill Road".to_string()),
        ("contactDetails", "9123456780".to_string()),
        ("city", "Mumbai".to_string()),
        ("treatment", "Dental Cleaning".to_string()),
        ("fees", "750".to_string()),
    ]
}

fn as_refs<'a>(fields: &'a [(&'static str, String)]) -> Vec<(&'static str, &'a str)> {
    fields.iter().map(|(k, v)| (*k, v.as_str())).collect()
}

async fn create_patient(app: &Router) -> Value {
    let fields = patient_fields(&twenty_years_ago());
    let body = multipart_body(&as_refs(&fields), None);
    let (status, patient) = send_json(app, multipart_request("POST", "/api/patients", body)).await;
    assert_eq!(status, StatusCode::CREATED);
    patient
}

#[tokio::test]
async fn create_patient_with_image() {
    let (app, uploads) = app().await;
    let fields = patient_fields(&twenty_years_ago());
    let body = multipart_body(
        &as_refs(&fields),
        Some(FilePart {
            file_name: "smile.png",
            content_type: "image/png",
            bytes: b"\x89PNG fake",
        }),
    );

    let (status, patient) = send_json(&app, multipart_request("POST", "/api/patients", body)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(patient["age"], 20);
    assert_eq!(patient["contact_details"], "9123456780");
    assert_eq!(patient["fees_minor"], 75_000);
    let image = patient["image"].as_str().unwrap().to_string();
    let (millis, rest) = image.split_once('-').unwrap();
    assert!(millis.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(rest, "smile.png");
    assert!(uploads.path().join(&image).exists());

    let (status, bytes) = send(&app, get(&format!("/uploads/{image}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"\x89PNG fake");
}

#[tokio::test]
async fn non_image_upload_is_rejected() {
    let (app, uploads) = app().await;
    let fields = patient_fields(&twenty_years_ago());
    let body = multipart_body(
        &as_refs(&fields),
        Some(FilePart {
            file_name: "notes.txt",
            content_type: "text/plain",
            bytes: b"hello",
        }),
    );

    let (status, error) = send_json(&app, multipart_request("POST", "/api/patients", body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "Only images are allowed");
    let (_, list) = send_json(&app, get("/api/patients")).await;
    assert_eq!(list, json!([]));
    assert_eq!(std::fs::read_dir(uploads.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn oversized_image_is_rejected() {
    let (app, uploads) = app().await;
    let fields = patient_fields(&twenty_years_ago());
    let bytes = vec![0u8; 5 * 1024 * 1024 + 1];
    let body = multipart_body(
        &as_refs(&fields),
        Some(FilePart {
            file_name: "scan.png",
            content_type: "image/png",
            bytes: &bytes,
        }),
    );

    let (status, error) = send_json(&app, multipart_request("POST", "/api/patients", body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "Image must be at most 5 MB");
    let (_, list) = send_json(&app, get("/api/patients")).await;
    assert_eq!(list, json!([]));
    assert_eq!(std::fs::read_dir(uploads.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn invalid_patient_is_a_bad_request() {
    let (app, uploads) = app().await;
    let mut fields = patient_fields(&twenty_years_ago());
    fields.retain(|(k, _)| *k != "name");
    let body = multipart_body(
        &as_refs(&fields),
        Some(FilePart {
            file_name: "smile.png",
            content_type: "image/png",
            bytes: b"png",
        }),
    );

    let (status, error) = send_json(&app, multipart_request("POST", "/api/patients", body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["message"], "Error creating patient");
    assert_eq!(error["error"], "name is required");
    // The stored image is removed again.
    assert_eq!(std::fs::read_dir(uploads.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn update_keeps_image_and_unknown_id_is_404() {
    let (app, _uploads) = app().await;
    let patient = create_patient(&app).await;
    let id = patient["id"].as_str().unwrap();

    let mut fields = patient_fields(&twenty_years_ago());
    fields.push(("image", "1700000000000-old.png".to_string()));
    fields[0].1 = "Priya S. Shah".to_string();
    let body = multipart_body(&as_refs(&fields), None);
    let (status, updated) = send_json(
        &app,
        multipart_request("PUT", &format!("/api/patients/{id}"), body),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Priya S. Shah");
    assert_eq!(updated["image"], "1700000000000-old.png");
    assert_eq!(updated["date_added"], patient["date_added"]);

    let fields = patient_fields(&twenty_years_ago());
    let body = multipart_body(&as_refs(&fields), None);
    let (status, error) = send_json(
        &app,
        multipart_request(
            "PUT",
            "/api/patients/6a8416ed-b8e6-4732-a591-bf55da9687e7",
            body,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["message"], "Patient not found");
}

#[tokio::test]
async fn delete_patient_leaves_appointment() {
    let (app, _uploads) = app().await;
    let patient = create_patient(&app).await;
    let id = patient["id"].as_str().unwrap();
    let date = (Utc::now() + Duration::days(3)).to_rfc3339();

    let (status, appointment) = send_json(
        &app,
        json_request(
            "POST",
            "/api/appointments",
            &json!({ "patient_id": id, "date": date, "treatment": "Scaling" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(appointment["status"], "Pending");
    assert_eq!(appointment["patient_name"], "Priya Shah");

    let req = Request::builder()
        .method("DELETE")
        .uri(format!("/api/patients/{id}"))
        .body(Body::empty())
        .unwrap();
    let (status, message) = send_json(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message, json!({ "message": "Patient deleted" }));

    let (_, list) = send_json(&app, get("/api/appointments")).await;
    assert_eq!(list[0]["patient_id"], id);
    assert_eq!(list[0]["patient_name"], Value::Null);
}

#[tokio::test]
async fn negative_expense_is_rejected() {
    let (app, _uploads) = app().await;

    let (status, error) = send_json(
        &app,
        json_request(
            "POST",
            "/api/expenses",
            &json!({ "type": "Rent", "description": "Shop", "amount_minor": -500 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["message"], "Error creating expense");
    let (_, list) = send_json(&app, get("/api/expenses")).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let (app, _uploads) = app().await;
    let req = Request::builder()
        .method("POST")
        .uri("/api/expenses")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"type\": \"Rent\""))
        .unwrap();

    let (status, error) = send_json(&app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["message"], "Invalid request");
}

#[tokio::test]
async fn expense_crud_and_reports() {
    let (app, _uploads) = app().await;
    create_patient(&app).await;

    let (status, expense) = send_json(
        &app,
        json_request(
            "POST",
            "/api/expenses",
            &json!({
                "type": "materials",
                "description": "Gloves",
                "amount_minor": 120_000,
                "category": "Dental"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(expense["type"], "Materials");
    let id = expense["id"].as_str().unwrap();

    let (status, updated) = send_json(
        &app,
        json_request(
            "PUT",
            &format!("/api/expenses/{id}"),
            &json!({
                "type": "Materials",
                "description": "Gloves (box)",
                "amount_minor": 100_000,
                "category": "Dental"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["created_at"], expense["created_at"]);

    let (status, overview) = send_json(&app, get("/api/reports/overview")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(overview["total_patients"], 1);
    assert_eq!(overview["total_expenses_minor"], 100_000);
    assert_eq!(overview["net_profit_minor"], -100_000);
    assert_eq!(overview["appointments_by_month"].as_array().unwrap().len(), 12);

    let (status, report) =
        send_json(&app, get("/api/reports/expenses?range=week&search=dent")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["range"], "week");
    assert_eq!(report["total_expenses_minor"], 100_000);
    assert_eq!(report["average_per_patient_minor"], 100_000);
    assert_eq!(report["dental_percentage"], 100.0);

    let (status, _) = send_json(&app, get("/api/reports/expenses?range=decade")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn exports_are_attachments() {
    let (app, _uploads) = app().await;
    create_patient(&app).await;

    let res = app.clone().oneshot(get("/api/exports/overview.pdf")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        res.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"Dental_Clinic_Overview.pdf\""
    );
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.starts_with(b"%PDF"));

    let (status, bytes) = send(&app, get("/api/exports/expenses.docx?type=Rent")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(bytes.starts_with(b"PK"));

    let (status, _) = send(&app, get("/api/exports/patients.csv")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
