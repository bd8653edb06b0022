use chrono::Utc;
use uuid::Uuid;

use sea_orm::{ConnectionTrait, QueryOrder, TransactionTrait, prelude::*};

use crate::{EngineError, Patient, PatientInput, ResultEngine, patients};

use super::{Engine, with_tx};

pub(super) async fn find_patient(
    db: &impl ConnectionTrait,
    id: Uuid,
) -> ResultEngine<Option<Patient>> {
    patients::Entity::find_by_id(id.to_string())
        .one(db)
        .await?
        .map(Patient::try_from)
        .transpose()
}

pub(super) async fn require_patient(db: &impl ConnectionTrait, id: Uuid) -> ResultEngine<Patient> {
    find_patient(db, id)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))
}

impl Engine {
    /// Every patient, in registration order.
    pub async fn patients(&self) -> ResultEngine<Vec<Patient>> {
        patients::Entity::find()
            .order_by_asc(patients::Column::DateAdded)
            .order_by_asc(patients::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Patient::try_from)
            .collect()
    }

    pub async fn patient(&self, id: Uuid) -> ResultEngine<Patient> {
        require_patient(&self.database, id).await
    }

    /// Validates and stores a new patient. The age is derived from `dob`.
    pub async fn create_patient(&self, input: PatientInput) -> ResultEngine<Patient> {
        let patient = Patient::from_input(&input, Utc::now())?;
        patients::ActiveModel::from(&patient)
            .insert(&self.database)
            .await?;
        Ok(patient)
    }

    /// Replaces the editable fields of a patient and recomputes its age.
    pub async fn update_patient(&self, id: Uuid, input: PatientInput) -> ResultEngine<Patient> {
        with_tx!(self, |db_tx| {
            let mut patient = require_patient(&db_tx, id).await?;
            patient.apply(&input, Utc::now().date_naive())?;
            patients::ActiveModel::from(&patient).update(&db_tx).await?;
            Ok(patient)
        })
    }

    /// Removes a patient. Its appointments are left untouched.
    pub async fn delete_patient(&self, id: Uuid) -> ResultEngine<Patient> {
        with_tx!(self, |db_tx| {
            let patient = require_patient(&db_tx, id).await?;
            patients::Entity::delete_by_id(id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(patient)
        })
    }
}
