use std::{any::Any, net::SocketAddr, path::PathBuf, sync::Arc};

use api_types::ErrorResponse;
use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};

use crate::{appointments, expenses, exports, patients, reports};
use engine::Engine;

/// Largest accepted request body (multipart overhead included).
const BODY_LIMIT: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    /// Directory holding uploaded patient images.
    pub upload_dir: Arc<PathBuf>,
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!("handler panicked: {detail}");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            message: "Something went wrong!".to_string(),
            error: "internal server error".to_string(),
        }),
    )
        .into_response()
}

pub fn router(state: ServerState) -> Router {
    let uploads = ServeDir::new(state.upload_dir.as_ref());

    Router::new()
        .route("/api/patients", get(patients::list).post(patients::create))
        .route(
            "/api/patients/{id}",
            get(patients::get)
                .put(patients::update)
                .delete(patients::delete),
        )
        .route("/api/expenses", get(expenses::list).post(expenses::create))
        .route(
            "/api/expenses/{id}",
            get(expenses::get)
                .put(expenses::update)
                .delete(expenses::delete),
        )
        .route(
            "/api/appointments",
            get(appointments::list).post(appointments::create),
        )
        .route(
            "/api/appointments/{id}",
            get(appointments::get)
                .put(appointments::update)
                .delete(appointments::delete),
        )
        .route("/api/reports/overview", get(reports::overview))
        .route("/api/reports/expenses", get(reports::expenses))
        .route("/api/exports/{file}", get(exports::download))
        .nest_service("/uploads", uploads)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

pub async fn run(engine: Engine, upload_dir: PathBuf, addr: SocketAddr) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {addr}: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, upload_dir, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    upload_dir: PathBuf,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tokio::fs::create_dir_all(&upload_dir).await?;
    tracing::info!(
        "Server listening on {}, uploads in {}",
        addr,
        upload_dir.display()
    );

    let state = ServerState {
        engine: Arc::new(engine),
        upload_dir: Arc::new(upload_dir),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    upload_dir: PathBuf,
    listener: tokio::net::TcpListener,
) -> Result<SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, upload_dir, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
