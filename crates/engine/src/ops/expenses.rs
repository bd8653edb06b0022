use chrono::Utc;
use uuid::Uuid;

use sea_orm::{ConnectionTrait, QueryOrder, TransactionTrait, prelude::*};

use crate::{EngineError, Expense, ExpenseInput, ResultEngine, expenses};

use super::{Engine, with_tx};

async fn require_expense(db: &impl ConnectionTrait, id: Uuid) -> ResultEngine<Expense> {
    expenses::Entity::find_by_id(id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))
        .and_then(Expense::try_from)
}

impl Engine {
    /// Every expense, in insertion order.
    pub async fn expenses(&self) -> ResultEngine<Vec<Expense>> {
        expenses::Entity::find()
            .order_by_asc(expenses::Column::CreatedAt)
            .order_by_asc(expenses::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Expense::try_from)
            .collect()
    }

    pub async fn expense(&self, id: Uuid) -> ResultEngine<Expense> {
        require_expense(&self.database, id).await
    }

    pub async fn create_expense(&self, input: ExpenseInput) -> ResultEngine<Expense> {
        let expense = Expense::from_input(&input, Utc::now())?;
        expenses::ActiveModel::from(&expense)
            .insert(&self.database)
            .await?;
        Ok(expense)
    }

    pub async fn update_expense(&self, id: Uuid, input: ExpenseInput) -> ResultEngine<Expense> {
        with_tx!(self, |db_tx| {
            let mut expense = require_expense(&db_tx, id).await?;
            expense.apply(&input, Utc::now())?;
            expenses::ActiveModel::from(&expense).update(&db_tx).await?;
            Ok(expense)
        })
    }

    pub async fn delete_expense(&self, id: Uuid) -> ResultEngine<Expense> {
        with_tx!(self, |db_tx| {
            let expense = require_expense(&db_tx, id).await?;
            expenses::Entity::delete_by_id(id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(expense)
        })
    }
}
