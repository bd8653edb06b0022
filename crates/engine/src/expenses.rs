//! The module contains `Expense` struct, `ExpenseType` and the sea-orm entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Money, ResultEngine,
    macros::labeled_enum,
    patients::parse_id,
    util::{ensure_non_negative, optional_text, required_text},
};

labeled_enum! {
    /// Kind of clinic expense.
    ExpenseType("expense type") {
        Groceries => "Groceries",
        Rent => "Rent",
        Utilities => "Utilities",
        Transport => "Transport",
        Materials => "Materials",
        Entertainment => "Entertainment",
        Other => "Other",
        DentalCheckup => "Dental Checkup",
        DentalCleaning => "Dental Cleaning",
        Orthodontics => "Orthodontics",
        DentalSurgery => "Dental Surgery",
        CosmeticDentistry => "Cosmetic Dentistry",
    }
}

/// Raw expense fields.
#[derive(Clone, Debug, Default)]
pub struct ExpenseInput {
    pub expense_type: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Money>,
    /// Defaults to the time of the save.
    pub date: Option<DateTime<Utc>>,
    pub category: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expense {
    pub id: Uuid,
    pub expense_type: ExpenseType,
    pub description: String,
    pub amount: Money,
    pub date: DateTime<Utc>,
    /// Free-text grouping used by the reports ("General" when missing).
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    pub fn from_input(input: &ExpenseInput, now: DateTime<Utc>) -> ResultEngine<Self> {
        let mut expense = Self {
            id: Uuid::new_v4(),
            expense_type: ExpenseType::Other,
            description: String::new(),
            amount: Money::ZERO,
            date: now,
            category: None,
            created_at: now,
            updated_at: now,
        };
        expense.apply(input, now)?;
        Ok(expense)
    }

    /// Replaces the editable fields and bumps `updated_at`.
    pub fn apply(&mut self, input: &ExpenseInput, now: DateTime<Utc>) -> ResultEngine<()> {
        let expense_type =
            ExpenseType::try_from(required_text(input.expense_type.as_deref(), "type")?.as_str())?;
        let description = required_text(input.description.as_deref(), "description")?;
        let amount = input
            .amount
            .ok_or_else(|| EngineError::Validation("amount is required".to_string()))?;
        let amount = ensure_non_negative(amount, "amount")?;

        self.expense_type = expense_type;
        self.description = description;
        self.amount = amount;
        self.date = input.date.unwrap_or(now);
        self.category = optional_text(input.category.as_deref());
        self.updated_at = now;
        Ok(())
    }

    /// Category label used for grouping.
    #[must_use]
    pub fn category_or_general(&self) -> &str {
        self.category.as_deref().unwrap_or("General")
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub expense_type: String,
    pub description: String,
    pub amount_minor: i64,
    pub date: DateTimeUtc,
    pub category: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(value: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            expense_type: ActiveValue::Set(value.expense_type.as_str().to_string()),
            description: ActiveValue::Set(value.description.clone()),
            amount_minor: ActiveValue::Set(value.amount.minor()),
            date: ActiveValue::Set(value.date),
            category: ActiveValue::Set(value.category.clone()),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id(&model.id)?,
            expense_type: ExpenseType::try_from(model.expense_type.as_str())?,
            description: model.description,
            amount: Money::new(model.amount_minor),
            date: model.date,
            category: model.category,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 9, 0, 0).unwrap()
    }

    fn input() -> ExpenseInput {
        ExpenseInput {
            expense_type: Some("Materials".to_string()),
            description: Some("Composite resin".to_string()),
            amount: Some(Money::new(250_000)),
            date: None,
            category: Some("Dental".to_string()),
        }
    }

    #[test]
    fn expense_defaults_date_to_now() {
        let expense = Expense::from_input(&input(), now()).unwrap();
        assert_eq!(expense.expense_type, ExpenseType::Materials);
        assert_eq!(expense.date, now());
        assert_eq!(expense.created_at, expense.updated_at);
    }

    #[test]
    fn negative_amount_is_rejected() {
        let mut input = input();
        input.amount = Some(Money::new(-500));
        assert_eq!(
            Expense::from_input(&input, now()),
            Err(EngineError::InvalidAmount(
                "amount must be a non-negative number".to_string()
            ))
        );
    }

    #[test]
    fn expense_type_parsing() {
        assert_eq!(
            ExpenseType::try_from("dental checkup").unwrap(),
            ExpenseType::DentalCheckup
        );
        assert_eq!(
            ExpenseType::try_from("COSMETIC_DENTISTRY").unwrap(),
            ExpenseType::CosmeticDentistry
        );
        assert_eq!(
            ExpenseType::try_from("Yacht"),
            Err(EngineError::Validation(
                "'Yacht' is not a valid expense type".to_string()
            ))
        );
        assert_eq!(ExpenseType::ALL.len(), 12);
    }

    #[test]
    fn update_keeps_creation_time() {
        let mut expense = Expense::from_input(&input(), now()).unwrap();
        let later = now() + chrono::Duration::hours(2);
        let mut edit = input();
        edit.category = None;
        expense.apply(&edit, later).unwrap();

        assert_eq!(expense.created_at, now());
        assert_eq!(expense.updated_at, later);
        assert_eq!(expense.category_or_general(), "General");
    }
}
