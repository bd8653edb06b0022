//! Clinic records engine.
//!
//! Owns the three record collections (patients, expenses, appointments),
//! their validation and persistence through sea-orm, and the pure
//! aggregation, pagination and export helpers used by the server and the
//! terminal client.

pub use appointments::{Appointment, AppointmentEntry, AppointmentInput, AppointmentStatus};
pub use error::EngineError;
pub use expenses::{Expense, ExpenseInput, ExpenseType};
pub use money::Money;
pub use ops::{DEFAULT_APPOINTMENT_FEE, Engine, EngineBuilder};
pub use patients::{Gender, Patient, PatientInput, Treatment};

pub mod age;
mod appointments;
mod error;
mod expenses;
pub mod export;
mod macros;
mod money;
mod ops;
pub mod pagination;
mod patients;
pub mod reports;
pub mod schedule;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
