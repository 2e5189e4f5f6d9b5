//! Transaction creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::{Markup, html};
use rusqlite::Connection;
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error,
    category::get_all_categories,
    change_notifier::{TRANSACTION_STALE_VIEWS, mutation_success},
    database_id::CategoryId,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        category_picker,
    },
    navigation::NavBar,
    transaction::{
        TransactionBuilder, TransactionDescription, create_transaction,
        domain::TransactionFormData,
    },
};

/// The state needed for creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the transaction creation page.
pub async fn get_new_transaction_page(
    State(state): State<CreateTransactionEndpointState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = category_options(&connection)?;
    let today = OffsetDateTime::now_utc().date();

    Ok(new_transaction_view(&categories, today).into_response())
}

/// Handle transaction creation form submission.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionEndpointState>,
    Form(form_data): Form<TransactionFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let categories = match category_options(&connection) {
        Ok(categories) => categories,
        Err(error) => return error.into_alert_response(),
    };

    let description = match TransactionDescription::new(&form_data.description) {
        Ok(description) => description,
        Err(error) => {
            return new_transaction_form_view(
                &categories,
                form_data.date,
                form_data.category_id,
                &format!("Error: {error}"),
            )
            .into_response();
        }
    };

    let builder = TransactionBuilder {
        description,
        amount: form_data.amount,
        date: form_data.date,
        category_id: form_data.category_id,
        notes: form_data.notes,
    };

    match create_transaction(builder, &connection) {
        Ok(_) => mutation_success(endpoints::TRANSACTIONS_VIEW, TRANSACTION_STALE_VIEWS),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a transaction: {error}");

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

fn new_transaction_view(categories: &[(CategoryId, String)], today: Date) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();
    let form = new_transaction_form_view(categories, today, None, "");

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Create Transaction", None, &content)
}

fn new_transaction_form_view(
    categories: &[(CategoryId, String)],
    date: Date,
    selected_category: Option<CategoryId>,
    error_message: &str,
) -> Markup {
    let create_transaction_endpoint = endpoints::POST_TRANSACTION;

    html! {
        form
            hx-post=(create_transaction_endpoint)
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
                    placeholder="0.00"
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
                    value=(date)
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
                    placeholder="Notes"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400"
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Transaction" }
        }
    }
}
