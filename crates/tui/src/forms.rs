//! Add/edit forms and their conversion into request payloads.

use std::path::PathBuf;

use api_types::{
    appointment::{AppointmentNew, AppointmentView},
    expense::{ExpenseNew, ExpenseView},
    patient::PatientView,
};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use engine::{AppointmentStatus, ExpenseType, Gender, Money, Treatment};
use uuid::Uuid;

use crate::client::PatientUpload;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Patient,
    Expense,
    Appointment,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    /// `(value, label)` pairs of a closed choice; empty for free text.
    pub options: Vec<(String, String)>,
}

impl Field {
    fn text(key: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            label,
            value: value.into(),
            options: Vec::new(),
        }
    }

    fn choice(
        key: &'static str,
        label: &'static str,
        value: impl Into<String>,
        options: Vec<(String, String)>,
    ) -> Self {
        Self {
            key,
            label,
            value: value.into(),
            options,
        }
    }

    pub fn is_choice(&self) -> bool {
        !self.options.is_empty()
    }

    /// Text shown in the form: the option label for choices.
    pub fn display(&self) -> &str {
        self.options
            .iter()
            .find(|(value, _)| *value == self.value)
            .map_or(self.value.as_str(), |(_, label)| label.as_str())
    }

    fn cycle(&mut self, forward: bool) {
        if self.options.is_empty() {
            return;
        }
        let len = self.options.len();
        let next = match self.options.iter().position(|(v, _)| *v == self.value) {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None => 0,
        };
        self.value = self.options[next].0.clone();
    }
}

fn labels(all: impl IntoIterator<Item = &'static str>) -> Vec<(String, String)> {
    all.into_iter()
        .map(|label| (label.to_string(), label.to_string()))
        .collect()
}

fn gender_options() -> Vec<(String, String)> {
    labels(Gender::ALL.iter().map(|g| g.as_str()))
}

fn treatment_options() -> Vec<(String, String)> {
    let mut options = vec![(String::new(), "None".to_string())];
    options.extend(labels(Treatment::ALL.iter().map(|t| t.as_str())));
    options
}

fn expense_type_options() -> Vec<(String, String)> {
    labels(ExpenseType::ALL.iter().map(|t| t.as_str()))
}

fn status_options() -> Vec<(String, String)> {
    labels(AppointmentStatus::ALL.iter().map(|s| s.as_str()))
}

fn patient_options(patients: &[PatientView]) -> Vec<(String, String)> {
    patients
        .iter()
        .map(|p| (p.id.to_string(), p.name.clone()))
        .collect()
}

fn local_date_time(value: &DateTime<Utc>, tz: Tz) -> String {
    value.with_timezone(&tz).format(DATE_TIME_FORMAT).to_string()
}

/// Reads `YYYY-MM-DD HH:MM` (or a bare date, at midnight) in `tz`.
fn parse_local(value: &str, tz: Tz, field: &str) -> Result<DateTime<FixedOffset>, String> {
    let value = value.trim();
    let naive = NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT)
        .or_else(|_| {
            NaiveDate::parse_from_str(value, DATE_FORMAT)
                .map(|date| date.and_time(NaiveTime::MIN))
        })
        .map_err(|_| format!("{field} must look like YYYY-MM-DD HH:MM"))?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.fixed_offset())
        .ok_or_else(|| format!("{field} does not exist in {tz}"))
}

#[derive(Debug, Clone)]
pub struct Form {
    pub kind: FormKind,
    pub title: String,
    pub fields: Vec<Field>,
    pub focus: usize,
    /// Record being edited; `None` when adding.
    pub target: Option<Uuid>,
}

impl Form {
    fn new(kind: FormKind, title: &str, fields: Vec<Field>, target: Option<Uuid>) -> Self {
        Self {
            kind,
            title: title.to_string(),
            fields,
            focus: 0,
            target,
        }
    }

    pub fn new_patient(today: NaiveDate) -> Self {
        let fields = vec![
            Field::text("name", "Name", ""),
            Field::text("dob", "Date of birth", ""),
            Field::choice("gender", "Gender", Gender::Male.as_str(), gender_options()),
            Field::text("address", "Address", ""),
            Field::text("contactDetails", "Contact", ""),
            Field::text("city", "City", ""),
            Field::choice("treatment", "Treatment", "", treatment_options()),
            Field::text("fees", "Fees", "0"),
            Field::text("registeredDate", "Registered", today.format(DATE_FORMAT).to_string()),
            Field::text("appointmentDate", "Next visit", ""),
            Field::text("image", "Image file", ""),
        ];
        Self::new(FormKind::Patient, "Add Patient", fields, None)
    }

    pub fn edit_patient(patient: &PatientView, tz: Tz) -> Self {
        let fields = vec![
            Field::text("name", "Name", patient.name.clone()),
            Field::text("dob", "Date of birth", patient.dob.format(DATE_FORMAT).to_string()),
            Field::choice("gender", "Gender", patient.gender.clone(), gender_options()),
            Field::text("address", "Address", patient.address.clone()),
            Field::text("contactDetails", "Contact", patient.contact_details.clone()),
            Field::text("city", "City", patient.city.clone().unwrap_or_default()),
            Field::choice(
                "treatment",
                "Treatment",
                patient.treatment.clone().unwrap_or_default(),
                treatment_options(),
            ),
            Field::text(
                "fees",
                "Fees",
                Money::new(patient.fees_minor).to_major_string(),
            ),
            Field::text(
                "registeredDate",
                "Registered",
                patient.registered_date.format(DATE_FORMAT).to_string(),
            ),
            Field::text(
                "appointmentDate",
                "Next visit",
                patient
                    .appointment_date
                    .map(|d| local_date_time(&d, tz))
                    .unwrap_or_default(),
            ),
            Field::text("image", "Image file", patient.image.clone().unwrap_or_default()),
        ];
        Self::new(FormKind::Patient, "Edit Patient", fields, Some(patient.id))
    }

    pub fn new_expense(today: NaiveDate) -> Self {
        let fields = vec![
            Field::choice("type", "Type", ExpenseType::ALL[0].as_str(), expense_type_options()),
            Field::text("description", "Description", ""),
            Field::text("amount", "Amount", ""),
            Field::text("date", "Date", today.format(DATE_FORMAT).to_string()),
            Field::text("category", "Category", ""),
        ];
        Self::new(FormKind::Expense, "Add Expense", fields, None)
    }

    pub fn edit_expense(expense: &ExpenseView, tz: Tz) -> Self {
        let fields = vec![
            Field::choice("type", "Type", expense.expense_type.clone(), expense_type_options()),
            Field::text("description", "Description", expense.description.clone()),
            Field::text(
                "amount",
                "Amount",
                Money::new(expense.amount_minor).to_major_string(),
            ),
            Field::text("date", "Date", local_date_time(&expense.date, tz)),
            Field::text("category", "Category", expense.category.clone().unwrap_or_default()),
        ];
        Self::new(FormKind::Expense, "Edit Expense", fields, Some(expense.id))
    }

    pub fn new_appointment(patients: &[PatientView], now: DateTime<Tz>) -> Self {
        let first = patients.first().map(|p| p.id.to_string()).unwrap_or_default();
        let fields = vec![
            Field::choice("patientId", "Patient", first, patient_options(patients)),
            Field::text("date", "Date", now.format(DATE_TIME_FORMAT).to_string()),
            Field::text("treatment", "Treatment", ""),
            Field::choice(
                "status",
                "Status",
                AppointmentStatus::default().as_str(),
                status_options(),
            ),
        ];
        Self::new(FormKind::Appointment, "Add Appointment", fields, None)
    }

    pub fn edit_appointment(
        appointment: &AppointmentView,
        patients: &[PatientView],
        tz: Tz,
    ) -> Self {
        let mut options = patient_options(patients);
        if !patients.iter().any(|p| p.id == appointment.patient_id) {
            options.insert(
                0,
                (appointment.patient_id.to_string(), "Unknown".to_string()),
            );
        }
        let fields = vec![
            Field::choice(
                "patientId",
                "Patient",
                appointment.patient_id.to_string(),
                options,
            ),
            Field::text("date", "Date", local_date_time(&appointment.date, tz)),
            Field::text("treatment", "Treatment", appointment.treatment.clone()),
            Field::choice("status", "Status", appointment.status.clone(), status_options()),
        ];
        Self::new(
            FormKind::Appointment,
            "Edit Appointment",
            fields,
            Some(appointment.id),
        )
    }

    pub fn focused(&self) -> Option<&Field> {
        self.fields.get(self.focus)
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Typing goes to free-text fields only; choices are cycled.
    pub fn input(&mut self, ch: char) {
        if let Some(field) = self.fields.get_mut(self.focus)
            && !field.is_choice()
        {
            field.value.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus)
            && !field.is_choice()
        {
            field.value.pop();
        }
    }

    pub fn cycle(&mut self, forward: bool) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.cycle(forward);
        }
    }

    pub fn value(&self, key: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map_or("", |f| f.value.trim())
    }

    /// Multipart fields of a patient form. A value in "Image file" that names
    /// a local file is uploaded; anything else is sent as the stored filename.
    pub fn patient_upload(&self, tz: Tz) -> Result<PatientUpload, String> {
        let mut upload = PatientUpload::default();
        for field in &self.fields {
            let value = field.value.trim();
            match field.key {
                "image" => {
                    let path = PathBuf::from(value);
                    if !value.is_empty() && path.is_file() {
                        upload.image_file = Some(path);
                    } else {
                        upload.fields.push(("image", value.to_string()));
                    }
                }
                "appointmentDate" if !value.is_empty() => {
                    let date = parse_local(value, tz, "Next visit")?;
                    upload.fields.push((field.key, date.to_rfc3339()));
                }
                key => upload.fields.push((key, value.to_string())),
            }
        }
        Ok(upload)
    }

    pub fn expense_payload(&self, tz: Tz) -> Result<ExpenseNew, String> {
        let amount = self.value("amount");
        if amount.is_empty() {
            return Err("Amount is required".to_string());
        }
        let amount: Money = amount.parse().map_err(|err: engine::EngineError| err.to_string())?;
        let date = match self.value("date") {
            "" => None,
            value => Some(parse_local(value, tz, "Date")?),
        };
        let category = Some(self.value("category").to_string()).filter(|c| !c.is_empty());
        Ok(ExpenseNew {
            expense_type: self.value("type").to_string(),
            description: self.value("description").to_string(),
            amount_minor: amount.minor(),
            date,
            category,
        })
    }

    pub fn appointment_payload(&self, tz: Tz) -> Result<AppointmentNew, String> {
        let patient_id = Uuid::parse_str(self.value("patientId"))
            .map_err(|_| "Pick a patient first".to_string())?;
        Ok(AppointmentNew {
            patient_id,
            date: parse_local(self.value("date"), tz, "Date")?,
            treatment: self.value("treatment").to_string(),
            status: Some(self.value("status").to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    fn type_text(form: &mut Form, text: &str) {
        for ch in text.chars() {
            form.input(ch);
        }
    }

    fn patient(name: &str) -> PatientView {
        PatientView {
            id: Uuid::new_v4(),
            name: name.to_string(),
            dob: NaiveDate::from_ymd_opt(1990, 5, 1).unwrap(),
            gender: "Female".to_string(),
            age: 36,
            address: "12 MG Road".to_string(),
            contact_details: "98450 00000".to_string(),
            city: None,
            treatment: Some("Orthodontics".to_string()),
            fees_minor: 150_000,
            registered_date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            appointment_date: None,
            image: Some("1700000000000-xray.png".to_string()),
            date_added: Utc::now(),
        }
    }

    #[test]
    fn choice_fields_cycle_and_ignore_typing() {
        let mut form = Form::new_patient(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        form.focus = 2;
        form.input('x');
        assert_eq!(form.value("gender"), "Male");
        form.cycle(true);
        assert_eq!(form.value("gender"), "Female");
        form.cycle(false);
        form.cycle(false);
        assert_eq!(form.value("gender"), "Other");

        form.focus = 6;
        assert_eq!(form.focused().unwrap().display(), "None");
        form.cycle(true);
        assert_eq!(form.value("treatment"), "Dental Checkup");
    }

    #[test]
    fn focus_wraps_both_ways() {
        let mut form = Form::new_expense(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        form.prev_field();
        assert_eq!(form.focused().unwrap().key, "category");
        form.next_field();
        assert_eq!(form.focused().unwrap().key, "type");
    }

    #[test]
    fn expense_payload_parses_amount_and_local_date() {
        let mut form = Form::new_expense(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        form.focus = 2;
        type_text(&mut form, "1250.50");
        let payload = form.expense_payload(chrono_tz::Asia::Kolkata).unwrap();
        assert_eq!(payload.amount_minor, 125_050);
        assert_eq!(payload.expense_type, "Groceries");
        assert_eq!(payload.category, None);
        let date = payload.date.unwrap();
        assert_eq!(date.offset().local_minus_utc(), 5 * 3600 + 30 * 60);
        assert_eq!((date.day(), date.hour()), (1, 0));
    }

    #[test]
    fn expense_payload_requires_a_number() {
        let form = Form::new_expense(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(
            form.expense_payload(chrono_tz::UTC).unwrap_err(),
            "Amount is required"
        );

        let mut form = form;
        form.focus = 2;
        type_text(&mut form, "lots");
        assert!(form.expense_payload(chrono_tz::UTC).is_err());
    }

    #[test]
    fn edit_patient_keeps_stored_image_name() {
        let view = patient("Asha");
        let form = Form::edit_patient(&view, chrono_tz::UTC);
        assert_eq!(form.target, Some(view.id));
        assert_eq!(form.value("fees"), "1500.00");

        let upload = form.patient_upload(chrono_tz::UTC).unwrap();
        assert!(upload.image_file.is_none());
        assert!(upload
            .fields
            .contains(&("image", "1700000000000-xray.png".to_string())));
        assert!(upload.fields.contains(&("contactDetails", "98450 00000".to_string())));
    }

    #[test]
    fn local_image_path_becomes_upload() {
        let file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        let mut form = Form::new_patient(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        form.focus = form.fields.len() - 1;
        type_text(&mut form, file.path().to_str().unwrap());

        let upload = form.patient_upload(chrono_tz::UTC).unwrap();
        assert_eq!(upload.image_file.as_deref(), Some(file.path()));
        assert!(!upload.fields.iter().any(|(key, _)| *key == "image"));
    }

    #[test]
    fn appointment_for_deleted_patient_shows_unknown() {
        let view = AppointmentView {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            patient_name: None,
            date: Utc::now(),
            treatment: "Dental Cleaning".to_string(),
            status: "Confirmed".to_string(),
        };
        let form = Form::edit_appointment(&view, &[patient("Ravi")], chrono_tz::UTC);
        assert_eq!(form.fields[0].display(), "Unknown");

        let payload = form.appointment_payload(chrono_tz::UTC).unwrap();
        assert_eq!(payload.patient_id, view.patient_id);
        assert_eq!(payload.status.as_deref(), Some("Confirmed"));
    }

    #[test]
    fn new_appointment_needs_a_patient() {
        let now = Utc::now().with_timezone(&chrono_tz::UTC);
        let form = Form::new_appointment(&[], now);
        assert_eq!(
            form.appointment_payload(chrono_tz::UTC).unwrap_err(),
            "Pick a patient first"
        );
    }
}
