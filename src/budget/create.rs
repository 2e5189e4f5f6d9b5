//! Budget creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    budget::{BudgetAmount, create_budget, domain::BudgetFormData},
    category::get_all_categories,
    change_notifier::{BUDGET_STALE_VIEWS, mutation_success},
    database_id::CategoryId,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        category_picker,
    },
    navigation::NavBar,
};

/// The state needed for creating a budget.
#[derive(Debug, Clone)]
pub struct CreateBudgetEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateBudgetEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the budget creation page.
///
/// The category picker is populated from the category table, so the page
/// needs the database connection.
pub async fn get_new_budget_page(
    State(state): State<CreateBudgetEndpointState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = category_options(&connection)?;

    Ok(new_budget_view(&categories).into_response())
}

/// Handle budget creation form submission.
pub async fn create_budget_endpoint(
    State(state): State<CreateBudgetEndpointState>,
    Form(new_budget): Form<BudgetFormData>,
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

    let amount = match BudgetAmount::new(new_budget.amount) {
        Ok(amount) => amount,
        Err(error) => {
            return new_budget_form_view(
                &categories,
                Some(new_budget.category_id),
                &format!("Error: {error}"),
            )
            .into_response();
        }
    };

    match create_budget(new_budget.category_id, amount, new_budget.notes, &connection) {
        Ok(_) => mutation_success(endpoints::BUDGETS_VIEW, BUDGET_STALE_VIEWS),
        Err(Error::DuplicateBudget) => new_budget_form_view(
            &categories,
            Some(new_budget.category_id),
            &format!("Error: {}", Error::DuplicateBudget),
        )
        .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a budget: {error}");

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

fn new_budget_view(categories: &[(CategoryId, String)]) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_BUDGET_VIEW).into_html();
    let form = new_budget_form_view(categories, None, "");

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Create Budget", None, &content)
}

fn new_budget_form_view(
    categories: &[(CategoryId, String)],
    selected_category: Option<CategoryId>,
    error_message: &str,
) -> Markup {
    let create_budget_endpoint = endpoints::POST_BUDGET;

    html! {
        form
            hx-post=(create_budget_endpoint)
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
                    placeholder="0.00"
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
                    placeholder="Notes"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400"
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Budget" }
        }
    }
}

#[cfg(test)]
mod new_budget_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use rusqlite::Connection;

    use crate::{
        budget::get_new_budget_page,
        category::{CategoryColor, CategoryName, create_category},
        endpoints, initialize_db,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_valid_html,
            must_get_form, parse_html_document,
        },
    };

    use super::CreateBudgetEndpointState;

    #[tokio::test]
    async fn render_page_with_category_options() {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize_db(&connection).expect("Could not initialize database");
        create_category(
            CategoryName::new_unchecked("Groceries"),
            CategoryColor::new_unchecked("#00ff00"),
            None,
            &connection,
        )
        .expect("Could not create test category");

        let state = CreateBudgetEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = get_new_budget_page(State(state))
            .await
            .expect("Could not get new budget page");

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::POST_BUDGET, "hx-post");
        assert_form_input(&form, "amount", "number");
        assert_form_input(&form, "notes", "text");
        assert_form_submit_button(&form);

        let select = scraper::Selector::parse("select[name=category_id]").unwrap();
        assert!(form.select(&select).next().is_some());
    }
}

#[cfg(test)]
mod create_budget_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use axum_extra::extract::Form;
    use rusqlite::Connection;

    use crate::{
        budget::{
            BudgetAmount, create::CreateBudgetEndpointState, create_budget_endpoint,
            domain::BudgetFormData, get_budget_by_category,
        },
        category::{CategoryColor, CategoryName, create_category},
        endpoints, initialize_db,
        test_utils::{
            assert_form_error_message, assert_hx_redirect, assert_valid_html, must_get_form,
            parse_html_fragment,
        },
    };

    fn get_budget_state() -> CreateBudgetEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize_db(&connection).expect("Could not initialize database");

        CreateBudgetEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn test_category(state: &CreateBudgetEndpointState) -> crate::category::Category {
        create_category(
            CategoryName::new_unchecked("Groceries"),
            CategoryColor::new_unchecked("#00ff00"),
            None,
            &state.db_connection.lock().unwrap(),
        )
        .expect("Could not create test category")
    }

    #[tokio::test]
    async fn can_create_budget() {
        let state = get_budget_state();
        let category = test_category(&state);
        let form = BudgetFormData {
            category_id: category.id,
            amount: 400.0,
            notes: None,
        };

        let response = create_budget_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::BUDGETS_VIEW);

        let budget = get_budget_by_category(category.id, &state.db_connection.lock().unwrap())
            .expect("Could not query budget")
            .expect("No budget created");
        assert_eq!(budget.amount, BudgetAmount::new_unchecked(400.0));
    }

    #[tokio::test]
    async fn create_budget_fails_on_non_positive_amount() {
        let state = get_budget_state();
        let category = test_category(&state);
        let form = BudgetFormData {
            category_id: category.id,
            amount: -5.0,
            notes: None,
        };

        let response = create_budget_endpoint(State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_form_error_message(
            &form,
            "Error: -5 is not a valid budget amount, the amount must be greater than zero",
        );
    }

    #[tokio::test]
    async fn create_budget_fails_for_category_with_existing_budget() {
        let state = get_budget_state();
        let category = test_category(&state);

        let first = BudgetFormData {
            category_id: category.id,
            amount: 400.0,
            notes: None,
        };
        create_budget_endpoint(State(state.clone()), Form(first))
            .await
            .into_response();

        let second = BudgetFormData {
            category_id: category.id,
            amount: 500.0,
            notes: None,
        };
        let response = create_budget_endpoint(State(state.clone()), Form(second))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_form_error_message(&form, "Error: A budget for this category already exists");

        // The losing submission must not create a second row.
        let budget_count: i64 = state
            .db_connection
            .lock()
            .unwrap()
            .prepare("SELECT COUNT(1) FROM budget")
            .unwrap()
            .query_row([], |row| row.get(0))
            .unwrap();
        assert_eq!(budget_count, 1);
    }
}
