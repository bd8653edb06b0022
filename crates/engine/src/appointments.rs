//! The module contains `Appointment` struct and its sea-orm entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    macros::labeled_enum,
    patients::parse_id,
    util::{optional_text, required_text},
};

labeled_enum! {
    /// Appointment lifecycle. Any transition is allowed.
    AppointmentStatus("status") {
        Pending => "Pending",
        Confirmed => "Confirmed",
        Completed => "Completed",
        Cancelled => "Cancelled",
    }
}

impl Default for AppointmentStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl AppointmentStatus {
    /// The status following `self`, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

#[derive(Clone, Debug)]
pub struct AppointmentInput {
    pub patient_id: Uuid,
    pub date: DateTime<Utc>,
    pub treatment: Option<String>,
    pub status: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Appointment {
    pub id: Uuid,
    /// Not enforced by the database: the patient may be deleted later.
    pub patient_id: Uuid,
    pub date: DateTime<Utc>,
    pub treatment: String,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

/// An appointment with the name of its patient, if still registered.
#[derive(Clone, Debug, PartialEq)]
pub struct AppointmentEntry {
    pub appointment: Appointment,
    pub patient_name: Option<String>,
}

impl Appointment {
    pub fn from_input(input: &AppointmentInput, now: DateTime<Utc>) -> ResultEngine<Self> {
        let mut appointment = Self {
            id: Uuid::new_v4(),
            patient_id: input.patient_id,
            date: input.date,
            treatment: String::new(),
            status: AppointmentStatus::default(),
            created_at: now,
        };
        appointment.apply(input)?;
        Ok(appointment)
    }

    pub fn apply(&mut self, input: &AppointmentInput) -> ResultEngine<()> {
        let treatment = required_text(input.treatment.as_deref(), "treatment")?;
        let status = optional_text(input.status.as_deref())
            .map(|s| AppointmentStatus::try_from(s.as_str()))
            .transpose()?
            .unwrap_or_default();

        self.patient_id = input.patient_id;
        self.date = input.date;
        self.treatment = treatment;
        self.status = status;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "appointments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub patient_id: String,
    pub date: DateTimeUtc,
    pub treatment: String,
    pub status: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::patients::Entity",
        from = "Column::PatientId",
        to = "super::patients::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Patients,
}

impl Related<super::patients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Patients.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Appointment> for ActiveModel {
    fn from(value: &Appointment) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            patient_id: ActiveValue::Set(value.patient_id.to_string()),
            date: ActiveValue::Set(value.date),
            treatment: ActiveValue::Set(value.treatment.clone()),
            status: ActiveValue::Set(value.status.as_str().to_string()),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for Appointment {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id(&model.id)?,
            patient_id: parse_id(&model.patient_id)?,
            date: model.date,
            treatment: model.treatment,
            status: AppointmentStatus::try_from(model.status.as_str())?,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn input() -> AppointmentInput {
        AppointmentInput {
            patient_id: Uuid::new_v4(),
            date: Utc.with_ymd_and_hms(2026, 10, 20, 11, 0, 0).unwrap(),
            treatment: Some("Root canal".to_string()),
            status: None,
        }
    }

    #[test]
    fn status_defaults_to_pending() {
        let appointment = Appointment::from_input(&input(), Utc::now()).unwrap();
        assert_eq!(appointment.status, AppointmentStatus::Pending);
    }

    #[test]
    fn any_status_transition_is_allowed() {
        let mut appointment = Appointment::from_input(&input(), Utc::now()).unwrap();
        for label in ["completed", "Pending", "CANCELLED", "confirmed"] {
            let mut edit = input();
            edit.status = Some(label.to_string());
            appointment.apply(&edit).unwrap();
        }
        assert_eq!(appointment.status, AppointmentStatus::Confirmed);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let mut edit = input();
        edit.status = Some("Done".to_string());
        assert_eq!(
            Appointment::from_input(&edit, Utc::now()),
            Err(EngineError::Validation(
                "'Done' is not a valid status".to_string()
            ))
        );
    }

    #[test]
    fn status_cycles() {
        assert_eq!(AppointmentStatus::Pending.next(), AppointmentStatus::Confirmed);
        assert_eq!(AppointmentStatus::Cancelled.next(), AppointmentStatus::Pending);
    }
}
