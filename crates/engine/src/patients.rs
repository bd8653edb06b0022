//! The module contains `Patient` struct, its enums and its sea-orm entity.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Money, ResultEngine,
    age::age_on,
    macros::labeled_enum,
    util::{non_negative_money, optional_text, parse_date, parse_timestamp, required_text},
};

labeled_enum! {
    /// Patient gender as recorded at registration.
    Gender("gender") {
        Male => "Male",
        Female => "Female",
        Other => "Other",
    }
}

labeled_enum! {
    /// Treatment a patient is registered for.
    Treatment("treatment") {
        DentalCheckup => "Dental Checkup",
        DentalCleaning => "Dental Cleaning",
        Orthodontics => "Orthodontics",
        DentalSurgery => "Dental Surgery",
        CosmeticDentistry => "Cosmetic Dentistry",
    }
}

/// Raw patient fields as submitted by a form.
///
/// Every field is optional text; [`Patient::from_input`] decides which ones
/// are required and parses the rest.
#[derive(Clone, Debug, Default)]
pub struct PatientInput {
    pub name: Option<String>,
    pub dob: Option<String>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub contact_details: Option<String>,
    pub city: Option<String>,
    pub treatment: Option<String>,
    pub fees: Option<String>,
    pub registered_date: Option<String>,
    pub appointment_date: Option<String>,
    /// Stored filename of the profile picture.
    pub image: Option<String>,
}

/// A registered patient.
#[derive(Clone, Debug, PartialEq)]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    pub dob: NaiveDate,
    pub gender: Gender,
    /// Full years on the day of the last save.
    pub age: u32,
    pub address: String,
    pub contact_details: String,
    pub city: Option<String>,
    pub treatment: Option<Treatment>,
    pub fees: Money,
    pub registered_date: NaiveDate,
    pub appointment_date: Option<DateTime<Utc>>,
    pub image: Option<String>,
    pub date_added: DateTime<Utc>,
}

impl Patient {
    /// Validates `input` and builds a new patient.
    ///
    /// `now` stamps `date_added`; its date is used as "today" for the age and
    /// the default registration date.
    pub fn from_input(input: &PatientInput, now: DateTime<Utc>) -> ResultEngine<Self> {
        let mut patient = Self {
            id: Uuid::new_v4(),
            name: String::new(),
            dob: now.date_naive(),
            gender: Gender::Other,
            age: 0,
            address: String::new(),
            contact_details: String::new(),
            city: None,
            treatment: None,
            fees: Money::ZERO,
            registered_date: now.date_naive(),
            appointment_date: None,
            image: None,
            date_added: now,
        };
        patient.apply(input, now.date_naive())?;
        Ok(patient)
    }

    /// Replaces every editable field with the validated `input`.
    ///
    /// On error `self` is left untouched.
    pub fn apply(&mut self, input: &PatientInput, today: NaiveDate) -> ResultEngine<()> {
        let name = required_text(input.name.as_deref(), "name")?;
        let dob = parse_date(&required_text(input.dob.as_deref(), "dob")?, "dob")?;
        if dob > today {
            return Err(EngineError::Validation(
                "dob must not be in the future".to_string(),
            ));
        }
        let gender = Gender::try_from(required_text(input.gender.as_deref(), "gender")?.as_str())?;
        let address = required_text(input.address.as_deref(), "address")?;
        let contact_details = required_text(input.contact_details.as_deref(), "contact_details")?;
        let treatment = optional_text(input.treatment.as_deref())
            .map(|t| Treatment::try_from(t.as_str()))
            .transpose()?;
        let fees = non_negative_money(input.fees.as_deref(), "fees")?;
        let registered_date = optional_text(input.registered_date.as_deref())
            .map(|d| parse_date(&d, "registered_date"))
            .transpose()?
            .unwrap_or(today);
        let appointment_date = optional_text(input.appointment_date.as_deref())
            .map(|d| parse_timestamp(&d, "appointment_date"))
            .transpose()?;

        self.name = name;
        self.dob = dob;
        self.gender = gender;
        self.age = age_on(dob, today);
        self.address = address;
        self.contact_details = contact_details;
        self.city = optional_text(input.city.as_deref());
        self.treatment = treatment;
        self.fees = fees;
        self.registered_date = registered_date;
        self.appointment_date = appointment_date;
        self.image = optional_text(input.image.as_deref());
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "patients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub dob: Date,
    pub gender: String,
    pub age: i32,
    pub address: String,
    pub contact_details: String,
    pub city: Option<String>,
    pub treatment: Option<String>,
    pub fees_minor: i64,
    pub registered_date: Date,
    pub appointment_date: Option<DateTimeUtc>,
    pub image: Option<String>,
    pub date_added: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Patient> for ActiveModel {
    fn from(value: &Patient) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            name: ActiveValue::Set(value.name.clone()),
            dob: ActiveValue::Set(value.dob),
            gender: ActiveValue::Set(value.gender.as_str().to_string()),
            age: ActiveValue::Set(i32::try_from(value.age).unwrap_or(i32::MAX)),
            address: ActiveValue::Set(value.address.clone()),
            contact_details: ActiveValue::Set(value.contact_details.clone()),
            city: ActiveValue::Set(value.city.clone()),
            treatment: ActiveValue::Set(value.treatment.map(|t| t.as_str().to_string())),
            fees_minor: ActiveValue::Set(value.fees.minor()),
            registered_date: ActiveValue::Set(value.registered_date),
            appointment_date: ActiveValue::Set(value.appointment_date),
            image: ActiveValue::Set(value.image.clone()),
            date_added: ActiveValue::Set(value.date_added),
        }
    }
}

impl TryFrom<Model> for Patient {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id(&model.id)?,
            name: model.name,
            dob: model.dob,
            gender: Gender::try_from(model.gender.as_str())?,
            age: u32::try_from(model.age).unwrap_or(0),
            address: model.address,
            contact_details: model.contact_details,
            city: model.city,
            treatment: model
                .treatment
                .as_deref()
                .map(Treatment::try_from)
                .transpose()?,
            fees: Money::new(model.fees_minor),
            registered_date: model.registered_date,
            appointment_date: model.appointment_date,
            image: model.image,
            date_added: model.date_added,
        })
    }
}

pub(crate) fn parse_id(value: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| EngineError::Validation(format!("invalid stored id '{value}'")))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 9, 0, 0).unwrap()
    }

    fn input() -> PatientInput {
        PatientInput {
            name: Some(" Asha Rao ".to_string()),
            dob: Some("2006-10-17".to_string()),
            gender: Some("female".to_string()),
            address: Some("12 MG Road".to_string()),
            contact_details: Some("9876543210".to_string()),
            treatment: Some("dental_cleaning".to_string()),
            fees: Some("1500".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn new_patient_derives_age_and_defaults() {
        let patient = Patient::from_input(&input(), now()).unwrap();

        assert_eq!(patient.name, "Asha Rao");
        assert_eq!(patient.gender, Gender::Female);
        assert_eq!(patient.age, 20);
        assert_eq!(patient.treatment, Some(Treatment::DentalCleaning));
        assert_eq!(patient.fees, Money::new(150_000));
        assert_eq!(patient.registered_date, now().date_naive());
        assert_eq!(patient.date_added, now());
        assert_eq!(patient.city, None);
    }

    #[test]
    fn missing_required_field() {
        let mut input = input();
        input.contact_details = Some("  ".to_string());
        assert_eq!(
            Patient::from_input(&input, now()),
            Err(EngineError::Validation(
                "contact_details is required".to_string()
            ))
        );
    }

    #[test]
    fn unknown_gender_is_rejected() {
        let mut input = input();
        input.gender = Some("unknown".to_string());
        assert_eq!(
            Patient::from_input(&input, now()),
            Err(EngineError::Validation(
                "'unknown' is not a valid gender".to_string()
            ))
        );
    }

    #[test]
    fn future_dob_is_rejected() {
        let mut input = input();
        input.dob = Some("2027-01-01".to_string());
        assert!(Patient::from_input(&input, now()).is_err());
    }

    #[test]
    fn failed_apply_keeps_previous_values() {
        let mut patient = Patient::from_input(&input(), now()).unwrap();
        let before = patient.clone();
        let mut bad = input();
        bad.fees = Some("-5".to_string());

        assert!(patient.apply(&bad, now().date_naive()).is_err());
        assert_eq!(patient, before);
    }

    #[test]
    fn model_round_trip_keeps_labels() {
        let patient = Patient::from_input(&input(), now()).unwrap();
        let model = Model {
            id: patient.id.to_string(),
            name: patient.name.clone(),
            dob: patient.dob,
            gender: "Female".to_string(),
            age: 20,
            address: patient.address.clone(),
            contact_details: patient.contact_details.clone(),
            city: None,
            treatment: Some("Dental Cleaning".to_string()),
            fees_minor: 150_000,
            registered_date: patient.registered_date,
            appointment_date: None,
            image: None,
            date_added: patient.date_added,
        };
        assert_eq!(Patient::try_from(model).unwrap(), patient);
    }
}
