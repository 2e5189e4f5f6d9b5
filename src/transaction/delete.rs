//! Transaction deletion endpoint.

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
    change_notifier::{TRANSACTION_STALE_VIEWS, mutation_success},
    database_id::TransactionId,
    endpoints,
    transaction::db::delete_transaction,
};

/// The state needed for deleting a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for deleting a transaction.
#[derive(Debug, Deserialize)]
pub struct DeleteTransactionFormData {
    /// The ID of the transaction to delete.
    pub id: TransactionId,
}

/// Handle transaction deletion. Transactions are deleted unconditionally.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionEndpointState>,
    Form(form_data): Form<DeleteTransactionFormData>,
) -> Response {
    let transaction_id = form_data.id;

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_transaction(transaction_id, &connection) {
        Ok(_) => mutation_success(endpoints::TRANSACTIONS_VIEW, TRANSACTION_STALE_VIEWS),
        Err(Error::DeleteMissingTransaction) => {
            Error::DeleteMissingTransaction.into_alert_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting transaction {transaction_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
