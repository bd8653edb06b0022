//! Expense API endpoints

use api_types::{
    Message,
    expense::{ExpenseNew, ExpenseView},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{Expense, ExpenseInput, Money};

use crate::{AppJson, ServerError, parse_id, server::ServerState};

pub(crate) fn view(expense: &Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        expense_type: expense.expense_type.as_str().to_string(),
        description: expense.description.clone(),
        amount_minor: expense.amount.minor(),
        date: expense.date,
        category: expense.category.clone(),
        created_at: expense.created_at,
        updated_at: expense.updated_at,
    }
}

fn input(payload: ExpenseNew) -> ExpenseInput {
    ExpenseInput {
        expense_type: Some(payload.expense_type),
        description: Some(payload.description),
        amount: Some(Money::new(payload.amount_minor)),
        date: payload.date.map(|d| d.with_timezone(&Utc)),
        category: payload.category,
    }
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<ExpenseView>>, ServerError> {
    let expenses = state
        .engine
        .expenses()
        .await
        .map_err(ServerError::context("Expense", "fetching"))?;
    Ok(Json(expenses.iter().map(view).collect()))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state
        .engine
        .expense(parse_id(&id)?)
        .await
        .map_err(ServerError::context("Expense", "fetching"))?;
    Ok(Json(view(&expense)))
}

/// Handle requests for recording an expense
pub async fn create(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let expense = state
        .engine
        .create_expense(input(payload))
        .await
        .map_err(ServerError::context("Expense", "creating"))?;
    tracing::debug!("created expense {}", expense.id);
    Ok((StatusCode::CREATED, Json(view(&expense))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<ExpenseNew>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state
        .engine
        .update_expense(parse_id(&id)?, input(payload))
        .await
        .map_err(ServerError::context("Expense", "updating"))?;
    Ok(Json(view(&expense)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Message>, ServerError> {
    state
        .engine
        .delete_expense(parse_id(&id)?)
        .await
        .map_err(ServerError::context("Expense", "deleting"))?;
    Ok(Json(Message {
        message: "Expense deleted".to_string(),
    }))
}
