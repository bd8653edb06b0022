//! Appointment API endpoints

use api_types::{
    Message,
    appointment::{AppointmentNew, AppointmentView},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{AppointmentEntry, AppointmentInput};

use crate::{AppJson, ServerError, parse_id, server::ServerState};

fn view(entry: &AppointmentEntry) -> AppointmentView {
    let appointment = &entry.appointment;
    AppointmentView {
        id: appointment.id,
        patient_id: appointment.patient_id,
        patient_name: entry.patient_name.clone(),
        date: appointment.date,
        treatment: appointment.treatment.clone(),
        status: appointment.status.as_str().to_string(),
    }
}

fn input(payload: AppointmentNew) -> AppointmentInput {
    AppointmentInput {
        patient_id: payload.patient_id,
        date: payload.date.with_timezone(&Utc),
        treatment: Some(payload.treatment),
        status: payload.status,
    }
}

/// Handle requests for listing appointments with their patient names
pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<AppointmentView>>, ServerError> {
    let entries = state
        .engine
        .appointments()
        .await
        .map_err(ServerError::context("Appointment", "fetching"))?;
    Ok(Json(entries.iter().map(view).collect()))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<AppointmentView>, ServerError> {
    let entry = state
        .engine
        .appointment(parse_id(&id)?)
        .await
        .map_err(ServerError::context("Appointment", "fetching"))?;
    Ok(Json(view(&entry)))
}

pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<AppointmentNew>,
) -> Result<(StatusCode, Json<AppointmentView>), ServerError> {
    let entry = state
        .engine
        .create_appointment(input(payload))
        .await
        .map_err(ServerError::context("Appointment", "creating"))?;
    tracing::debug!("created appointment {}", entry.appointment.id);
    Ok((StatusCode::CREATED, Json(view(&entry))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<AppointmentNew>,
) -> Result<Json<AppointmentView>, ServerError> {
    let entry = state
        .engine
        .update_appointment(parse_id(&id)?, input(payload))
        .await
        .map_err(ServerError::context("Appointment", "updating"))?;
    Ok(Json(view(&entry)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Message>, ServerError> {
    state
        .engine
        .delete_appointment(parse_id(&id)?)
        .await
        .map_err(ServerError::context("Appointment", "deleting"))?;
    Ok(Json(Message {
        message: "Appointment deleted".to_string(),
    }))
}
