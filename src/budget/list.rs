//! Budgets listing page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    budget::{BudgetWithCategory, get_all_budgets},
    change_notifier::StaleView,
    endpoints,
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        TABLE_SECTION_STYLE, TABLE_STYLE, base, category_badge, edit_delete_action_links,
        format_currency,
    },
    navigation::NavBar,
};

/// The state needed for the budgets listing page.
#[derive(Debug, Clone)]
pub struct BudgetsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BudgetsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the budgets listing page.
pub async fn get_budgets_page(State(state): State<BudgetsPageState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let budgets = get_all_budgets(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve budgets: {error}"))?;

    Ok(budgets_view(&budgets).into_response())
}

fn budgets_view(budgets: &[BudgetWithCategory]) -> Markup {
    let new_budget_route = endpoints::NEW_BUDGET_VIEW;
    let nav_bar = NavBar::new(endpoints::BUDGETS_VIEW).into_html();

    let table_row = |budget_with_category: &BudgetWithCategory| {
        let budget = &budget_with_category.budget;
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_BUDGET_VIEW, budget.id.as_i64());
        let confirm_message = format!(
            "Are you sure you want to delete the budget for '{}'?",
            budget_with_category.category_name
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    (category_badge(
                        &budget_with_category.category_name,
                        &budget_with_category.category_color,
                    ))
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (format_currency(budget.amount.as_f64()))
                }

                td class=(TABLE_CELL_STYLE)
                {
                    @if let Some(notes) = &budget.notes {
                        (notes)
                    } @else {
                        span class="text-gray-400 dark:text-gray-500" { "—" }
                    }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &edit_url,
                            endpoints::DELETE_BUDGET,
                            budget.id.as_i64(),
                            &confirm_message,
                        ))
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Budgets" }

                    a href=(new_budget_route) class=(LINK_STYLE)
                    {
                        "Create Budget"
                    }
                }

                section class=(TABLE_SECTION_STYLE)
                {
                    table class=(TABLE_STYLE)
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Monthly Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Notes" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for budget_with_category in budgets {
                                (table_row(budget_with_category))
                            }

                            @if budgets.is_empty() {
                                tr
                                {
                                    td
                                        colspan="4"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No budgets created yet. "
                                        a href=(new_budget_route) class=(LINK_STYLE)
                                        {
                                            "Create your first budget"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base(
        "Budgets",
        Some((StaleView::Budgets.refresh_event(), endpoints::BUDGETS_VIEW)),
        &content,
    )
}

#[cfg(test)]
mod budgets_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;
    use scraper::Selector;

    use crate::{
        budget::{BudgetAmount, create_budget},
        category::{CategoryColor, CategoryName, create_category},
        initialize_db,
        test_utils::{assert_valid_html, parse_html_document},
    };

    use super::{BudgetsPageState, get_budgets_page};

    fn get_budgets_page_state() -> BudgetsPageState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize_db(&connection).expect("Could not initialize database");

        BudgetsPageState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn renders_budget_rows_with_category_and_amount() {
        let state = get_budgets_page_state();
        {
            let connection = state.db_connection.lock().unwrap();
            let category = create_category(
                CategoryName::new_unchecked("Groceries"),
                CategoryColor::new_unchecked("#00ff00"),
                None,
                &connection,
            )
            .expect("Could not create test category");
            create_budget(
                category.id,
                BudgetAmount::new_unchecked(400.0),
                None,
                &connection,
            )
            .expect("Could not create test budget");
        }

        let response = get_budgets_page(State(state))
            .await
            .expect("Could not get budgets page");

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let row_selector = Selector::parse("tbody tr").unwrap();
        assert_eq!(html.select(&row_selector).count(), 1);

        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Groceries"));
        assert!(text.contains("$400.00"));
    }

    #[tokio::test]
    async fn renders_empty_state() {
        let state = get_budgets_page_state();

        let response = get_budgets_page(State(state))
            .await
            .expect("Could not get budgets page");

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("No budgets created yet."));
    }
}
