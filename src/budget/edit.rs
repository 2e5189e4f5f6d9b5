//! Budget editing page and endpoint.

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
    budget::{BudgetAmount, domain::BudgetFormData, get_budget, update_budget},
    category::get_all_categories,
    change_notifier::{BUDGET_STALE_VIEWS, mutation_success},
    database_id::{BudgetId, CategoryId},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        category_picker,
    },
    navigation::NavBar,
};

/// The state needed for the edit budget page.
#[derive(Debug, Clone)]
pub struct EditBudgetPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditBudgetPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The state needed for updating a budget.
#[derive(Debug, Clone)]
pub struct UpdateBudgetEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateBudgetEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the budget editing page.
pub async fn get_edit_budget_page(
    Path(budget_id): Path<BudgetId>,
    State(state): State<EditBudgetPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_BUDGET_VIEW, budget_id.as_i64());
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_BUDGET, budget_id.as_i64());
    let categories = category_options(&connection)?;

    match get_budget(budget_id, &connection) {
        Ok(budget) => {
            let form_data = BudgetFormData {
                category_id: budget.category_id,
                amount: budget.amount.as_f64(),
                notes: budget.notes,
            };

            Ok(edit_budget_view(
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
                Error::NotFound => "Budget not found",
                _ => {
                    tracing::error!("Failed to retrieve budget {budget_id}: {error}");
                    "Failed to load budget"
                }
            };

            Ok(edit_budget_view(
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

/// Handle budget update form submission.
pub async fn update_budget_endpoint(
    Path(budget_id): Path<BudgetId>,
    State(state): State<UpdateBudgetEndpointState>,
    Form(form_data): Form<BudgetFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_BUDGET, budget_id.as_i64());

    let categories = match category_options(&connection) {
        Ok(categories) => categories,
        Err(error) => return error.into_alert_response(),
    };

    let amount = match BudgetAmount::new(form_data.amount) {
        Ok(amount) => amount,
        Err(error) => {
            return edit_budget_form_view(
                &update_endpoint,
                &categories,
                Some(&form_data),
                &format!("Error: {error}"),
            )
            .into_response();
        }
    };

    match update_budget(
        budget_id,
        form_data.category_id,
        amount,
        form_data.notes.clone(),
        &connection,
    ) {
        Ok(_) => mutation_success(endpoints::BUDGETS_VIEW, BUDGET_STALE_VIEWS),
        Err(Error::UpdateMissingBudget) => Error::UpdateMissingBudget.into_alert_response(),
        Err(Error::DuplicateBudget) => edit_budget_form_view(
            &update_endpoint,
            &categories,
            Some(&form_data),
            &format!("Error: {}", Error::DuplicateBudget),
        )
        .into_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating budget {budget_id}: {error}"
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

fn edit_budget_view(
    edit_endpoint: &str,
    update_endpoint: &str,
    categories: &[(CategoryId, String)],
    form_data: Option<&BudgetFormData>,
    error_message: &str,
) -> Markup {
    let nav_bar = NavBar::new(edit_endpoint).into_html();
    let form = edit_budget_form_view(update_endpoint, categories, form_data, error_message);

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Edit Budget", None, &content)
}

fn edit_budget_form_view(
    update_endpoint: &str,
    categories: &[(CategoryId, String)],
    form_data: Option<&BudgetFormData>,
    error_message: &str,
) -> Markup {
    let selected_category = form_data.map(|data| data.category_id);

    html! {
        form
            hx-put=(update_endpoint)
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            (category_picker(categories, selected_category, false))

            div
            {
                label
                    for="amount"
                    class=(FORM_LABEL_STYLE)
                {
                    "Monthly Amount"
                }

                input
                    id="amount"
                    type="number"
                    name="amount"
                    step="0.01"
                    min="0.01"
                    value=[form_data.map(|data| data.amount)]
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

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

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Update Budget" }
        }
    }
}
