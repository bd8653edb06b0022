//! Patient API endpoints.
//!
//! Create and update take a multipart form so that a profile image can travel
//! with the text fields.

use api_types::{Message, patient::PatientView};
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use engine::{Patient, PatientInput};

use crate::{
    ServerError, parse_id,
    server::ServerState,
    upload::{self, ImageUpload},
};

pub(crate) fn view(patient: &Patient) -> PatientView {
    PatientView {
        id: patient.id,
        name: patient.name.clone(),
        dob: patient.dob,
        gender: patient.gender.as_str().to_string(),
        age: patient.age,
        address: patient.address.clone(),
        contact_details: patient.contact_details.clone(),
        city: patient.city.clone(),
        treatment: patient.treatment.map(|t| t.as_str().to_string()),
        fees_minor: patient.fees.minor(),
        registered_date: patient.registered_date,
        appointment_date: patient.appointment_date,
        image: patient.image.clone(),
        date_added: patient.date_added,
    }
}

/// `contactDetails` -> `contact_details`; snake_case names pass through.
fn field_key(name: &str) -> String {
    let mut key = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            key.push('_');
            key.push(c.to_ascii_lowercase());
        } else {
            key.push(c);
        }
    }
    key
}

/// Parsed multipart form.
struct PatientForm {
    input: PatientInput,
    /// Text `image` part: the filename the patient already has.
    image_name: Option<String>,
    upload: Option<ImageUpload>,
}

async fn read_form(mut multipart: Multipart) -> Result<PatientForm, ServerError> {
    let mut form = PatientForm {
        input: PatientInput::default(),
        image_name: None,
        upload: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::Generic(e.body_text()))?
    {
        let key = field_key(field.name().unwrap_or_default());
        if key == "image" {
            if field.file_name().is_some() {
                form.upload = Some(upload::read_image(field).await?);
            } else {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ServerError::Generic(e.body_text()))?;
                form.image_name = Some(text);
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| ServerError::Generic(e.body_text()))?;
        let slot = match key.as_str() {
            "name" => &mut form.input.name,
            "dob" => &mut form.input.dob,
            "gender" => &mut form.input.gender,
            "address" => &mut form.input.address,
            "contact_details" => &mut form.input.contact_details,
            "city" => &mut form.input.city,
            "treatment" => &mut form.input.treatment,
            "fees" => &mut form.input.fees,
            "registered_date" => &mut form.input.registered_date,
            "appointment_date" => &mut form.input.appointment_date,
            other => {
                tracing::debug!("ignoring unknown patient field {other}");
                continue;
            }
        };
        *slot = Some(value);
    }

    Ok(form)
}

/// Handle requests for listing every patient
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<PatientView>>, ServerError> {
    let patients = state
        .engine
        .patients()
        .await
        .map_err(ServerError::context("Patient", "fetching"))?;
    Ok(Json(patients.iter().map(view).collect()))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<PatientView>, ServerError> {
    let patient = state
        .engine
        .patient(parse_id(&id)?)
        .await
        .map_err(ServerError::context("Patient", "fetching"))?;
    Ok(Json(view(&patient)))
}

/// Handle requests for registering a patient
pub async fn create(
    State(state): State<ServerState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<PatientView>), ServerError> {
    let mut form = read_form(multipart).await?;
    let stored = match form.upload.take() {
        Some(upload) => Some(upload::store(&state.upload_dir, upload).await?),
        None => None,
    };
    form.input.image = stored.clone();

    match state.engine.create_patient(form.input).await {
        Ok(patient) => {
            tracing::debug!("created patient {}", patient.id);
            Ok((StatusCode::CREATED, Json(view(&patient))))
        }
        Err(err) => {
            if let Some(filename) = stored {
                upload::discard(&state.upload_dir, &filename).await;
            }
            Err(ServerError::context("Patient", "creating")(err))
        }
    }
}

/// Handle requests for replacing a patient.
///
/// A new file replaces the image; a text `image` part sets the filename
/// explicitly (empty clears it); otherwise the current image is kept.
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<PatientView>, ServerError> {
    let id = parse_id(&id)?;
    let mut form = read_form(multipart).await?;
    let current = state
        .engine
        .patient(id)
        .await
        .map_err(ServerError::context("Patient", "updating"))?;

    let stored = match form.upload.take() {
        Some(upload) => Some(upload::store(&state.upload_dir, upload).await?),
        None => None,
    };
    form.input.image = match (&stored, form.image_name.take()) {
        (Some(filename), _) => Some(filename.clone()),
        (None, Some(name)) => Some(name),
        (None, None) => current.image,
    };

    match state.engine.update_patient(id, form.input).await {
        Ok(patient) => Ok(Json(view(&patient))),
        Err(err) => {
            if let Some(filename) = stored {
                upload::discard(&state.upload_dir, &filename).await;
            }
            Err(ServerError::context("Patient", "updating")(err))
        }
    }
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Message>, ServerError> {
    let patient = state
        .engine
        .delete_patient(parse_id(&id)?)
        .await
        .map_err(ServerError::context("Patient", "deleting"))?;
    tracing::debug!("deleted patient {}", patient.id);
    Ok(Json(Message {
        message: "Patient deleted".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_fields_are_accepted() {
        assert_eq!(field_key("contactDetails"), "contact_details");
        assert_eq!(field_key("registeredDate"), "registered_date");
        assert_eq!(field_key("appointment_date"), "appointment_date");
        assert_eq!(field_key("name"), "name");
    }
}
