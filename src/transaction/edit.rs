//! Transaction editing page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::get_all_categories,
    change_notifier::{TRANSACTION_STALE_VIEWS, mutation_success},
    database_id::{CategoryId, TransactionId},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        category_picker,
    },
    navigation::NavBar,
    transaction::{
        TransactionBuilder, TransactionDescription, domain::TransactionFormData, get_transaction,
        update_transaction,
    },
};

/// The state needed for the edit transaction page.
#[derive(Debug, Clone)]
pub struct EditTransactionPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The state needed for updating a transaction.
#[derive(Debug, Clone)]
pub struct UpdateTransactionEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateTransactionEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the transaction editing page.
pub async fn get_edit_transaction_page(
    Path(transaction_id): Path<TransactionId>,
    State(state): State<EditTransactionPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let edit_endpoint =
        endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction_id.as_i64());
    let update_endpoint =
        endpoints::format_endpoint(endpoints::PUT_TRANSACTION, transaction_id.as_i64());
    let categories = category_options(&connection)?;

    match get_transaction(transaction_id, &connection) {
        Ok(transaction) => {
            let form_data = TransactionFormData {
                description: transaction.description.to_string(),
                amount: transaction.amount,
                date: transaction.date,
                category_id: transaction.category_id,
                notes: transaction.notes,
            };

            Ok(edit_transaction_view(
                &edit_endpoint,
                &update_endpoint,
                &categories,
                Some(&form_data),
                "",
            )
            .into_response())
        }
        Err(error) => {
            let error_message = match error {
                Error::NotFound => "Transaction not found",
                _ => {
                    tracing::error!("Failed to retrieve transaction {transaction_id}: {error}");
                    "Failed to load transaction"
                }
            };

            Ok(edit_transaction_view(
                &edit_endpoint,
                &update_endpoint,
                &categories,
                None,
                error_message,
            )
            .into_response())
        }
    }
}

/// Handle transaction update form submission.
pub async fn update_transaction_endpoint(
    Path(transaction_id): Path<TransactionId>,
    State(state): State<UpdateTransactionEndpointState>,
    Form(form_data): Form<TransactionFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let update_endpoint =
        endpoints::format_endpoint(endpoints::PUT_TRANSACTION, transaction_id.as_i64());

    let categories = match category_options(&connection) {
        Ok(categories) => categories,
        Err(error) => return error.into_alert_response(),
    };

    let description = match TransactionDescription::new(&form_data.description) {
        Ok(description) => description,
        Err(error) => {
            return edit_transaction_form_view(
                &update_endpoint,
                &categories,
                Some(&form_data),
                &format!("Error: {error}"),
            )
            .into_response();
        }
    };

    let builder = TransactionBuilder {
        description,
        amount: form_data.amount,
        date: form_data.date,
        // A cleared picker submits no category, which clears the stored
        // reference.
        category_id: form_data.category_id,
        notes: form_data.notes.clone(),
    };

    match update_transaction(transaction_id, builder, &connection) {
        Ok(_) => mutation_success(endpoints::TRANSACTIONS_VIEW, TRANSACTION_STALE_VIEWS),
        Err(Error::UpdateMissingTransaction) => {
            Error::UpdateMissingTransaction.into_alert_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating transaction {transaction_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

fn category_options(connection: &Connection) -> Result<Vec<(CategoryId, String)>, Error> {
    Ok(get_all_categories(connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?
        .into_iter()
        .map(|category| (category.id, category.name.to_string()))
        .collect())
}

fn edit_transaction_view(
    edit_endpoint: &str,
    update_endpoint: &str,
    categories: &[(CategoryId, String)],
    form_data: Option<&TransactionFormData>,
    error_message: &str,
) -> Markup {
    let nav_bar = NavBar::new(edit_endpoint).into_html();
    let form = edit_transaction_form_view(update_endpoint, categories, form_data, error_message);

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Edit Transaction", None, &content)
}

fn edit_transaction_form_view(
    update_endpoint: &str,
    categories: &[(CategoryId, String)],
    form_data: Option<&TransactionFormData>,
    error_message: &str,
) -> Markup {
    let selected_category = form_data.and_then(|data| data.category_id);

    html! {
        form
            hx-put=(update_endpoint)
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label
                    for="description"
                    class=(FORM_LABEL_STYLE)
                {
                    "Description"
                }

                input
                    id="description"
                    type="text"
                    name="description"
                    placeholder="Description"
                    value=[form_data.map(|data| &data.description)]
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label
                    for="amount"
                    class=(FORM_LABEL_STYLE)
                {
                    "Amount (negative for expenses)"
                }

                input
                    id="amount"
                    type="number"
                    name="amount"
                    step="0.01"
                    value=[form_data.map(|data| data.amount)]
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label
                    for="date"
                    class=(FORM_LABEL_STYLE)
                {
                    "Date"
                }

                input
                    id="date"
                    type="date"
                    name="date"
                    value=[form_data.map(|data| data.date)]
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            (category_picker(categories, selected_category, true))

            div
            {
                label
                    for="notes"
                    class=(FORM_LABEL_STYLE)
                {
                    "Notes (optional)"
                }

                input
                    id="notes"
                    type="text"
                    name="notes"
                    value=[form_data.and_then(|data| data.notes.as_ref())]
                    placeholder="Notes"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400"
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Update Transaction" }
        }
    }
}
