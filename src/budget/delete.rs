//! Budget deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    budget::db::delete_budget,
    change_notifier::{BUDGET_STALE_VIEWS, mutation_success},
    database_id::BudgetId,
    endpoints,
};

/// The state needed for deleting a budget.
#[derive(Debug, Clone)]
pub struct DeleteBudgetEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteBudgetEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for deleting a budget.
#[derive(Debug, Deserialize)]
pub struct DeleteBudgetFormData {
    /// The ID of the budget to delete.
    pub id: BudgetId,
}

/// Handle budget deletion. Budgets are deleted unconditionally.
pub async fn delete_budget_endpoint(
    State(state): State<DeleteBudgetEndpointState>,
    Form(form_data): Form<DeleteBudgetFormData>,
) -> Response {
    let budget_id = form_data.id;

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_budget(budget_id, &connection) {
        Ok(_) => mutation_success(endpoints::BUDGETS_VIEW, BUDGET_STALE_VIEWS),
        Err(Error::DeleteMissingBudget) => Error::DeleteMissingBudget.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting budget {budget_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
