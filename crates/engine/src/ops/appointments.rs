use chrono::Utc;
use uuid::Uuid;

use sea_orm::{ConnectionTrait, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Appointment, AppointmentEntry, AppointmentInput, EngineError, ResultEngine, appointments,
    patients,
};

use super::{Engine, patients::find_patient, with_tx};

fn entry(
    (model, patient): (appointments::Model, Option<patients::Model>),
) -> ResultEngine<AppointmentEntry> {
    Ok(AppointmentEntry {
        appointment: Appointment::try_from(model)?,
        patient_name: patient.map(|p| p.name),
    })
}

async fn require_appointment(db: &impl ConnectionTrait, id: Uuid) -> ResultEngine<AppointmentEntry> {
    appointments::Entity::find_by_id(id.to_string())
        .find_also_related(patients::Entity)
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))
        .and_then(entry)
}

/// Name of the referenced patient, rejecting unknown ids.
///
/// The check and the following write are not atomic with later patient
/// deletions: a reference may still dangle afterwards.
async fn referenced_patient_name(db: &impl ConnectionTrait, id: Uuid) -> ResultEngine<String> {
    find_patient(db, id)
        .await?
        .map(|p| p.name)
        .ok_or_else(|| EngineError::Validation(format!("patient '{id}' does not exist")))
}

impl Engine {
    /// Every appointment in insertion order, with the patient name when the
    /// patient still exists.
    pub async fn appointments(&self) -> ResultEngine<Vec<AppointmentEntry>> {
        appointments::Entity::find()
            .find_also_related(patients::Entity)
            .order_by_asc(appointments::Column::CreatedAt)
            .order_by_asc(appointments::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(entry)
            .collect()
    }

    pub async fn appointment(&self, id: Uuid) -> ResultEngine<AppointmentEntry> {
        require_appointment(&self.database, id).await
    }

    pub async fn create_appointment(
        &self,
        input: AppointmentInput,
    ) -> ResultEngine<AppointmentEntry> {
        let appointment = Appointment::from_input(&input, Utc::now())?;
        let patient_name = referenced_patient_name(&self.database, appointment.patient_id).await?;
        appointments::ActiveModel::from(&appointment)
            .insert(&self.database)
            .await?;
        Ok(AppointmentEntry {
            appointment,
            patient_name: Some(patient_name),
        })
    }

    pub async fn update_appointment(
        &self,
        id: Uuid,
        input: AppointmentInput,
    ) -> ResultEngine<AppointmentEntry> {
        with_tx!(self, |db_tx| {
            let current = require_appointment(&db_tx, id).await?;
            let mut appointment = current.appointment;
            let previous_patient = appointment.patient_id;
            appointment.apply(&input)?;
            // Only a new reference must resolve; an existing one may dangle.
            let patient_name = if appointment.patient_id == previous_patient {
                find_patient(&db_tx, previous_patient).await?.map(|p| p.name)
            } else {
                Some(referenced_patient_name(&db_tx, appointment.patient_id).await?)
            };
            appointments::ActiveModel::from(&appointment)
                .update(&db_tx)
                .await?;
            Ok(AppointmentEntry {
                appointment,
                patient_name,
            })
        })
    }

    pub async fn delete_appointment(&self, id: Uuid) -> ResultEngine<AppointmentEntry> {
        with_tx!(self, |db_tx| {
            let entry = require_appointment(&db_tx, id).await?;
            appointments::Entity::delete_by_id(id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(entry)
        })
    }
}
