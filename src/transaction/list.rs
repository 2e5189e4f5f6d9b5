//! Transactions listing page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    change_notifier::StaleView,
    endpoints,
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        TABLE_SECTION_STYLE, TABLE_STYLE, base, category_badge, edit_delete_action_links,
        format_currency,
    },
    navigation::NavBar,
    transaction::{TransactionWithCategory, get_all_transactions},
};

/// The state needed for the transactions listing page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the transactions listing page, newest first.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_all_transactions(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve transactions: {error}"))?;

    Ok(transactions_view(&transactions).into_response())
}

fn transactions_view(transactions: &[TransactionWithCategory]) -> Markup {
    let new_transaction_route = endpoints::NEW_TRANSACTION_VIEW;
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let table_row = |transaction_with_category: &TransactionWithCategory| {
        let transaction = &transaction_with_category.transaction;
        let edit_url =
            endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id.as_i64());
        let confirm_message = format!(
            "Are you sure you want to delete '{}'?",
            transaction.description
        );

        let amount_style = if transaction.amount < 0.0 {
            "text-red-600 dark:text-red-400"
        } else {
            "text-green-600 dark:text-green-400"
        };

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    (transaction.date)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (transaction.description)
                }

                td class={(TABLE_CELL_STYLE) " " (amount_style)}
                {
                    (format_currency(transaction.amount))
                }

                td class=(TABLE_CELL_STYLE)
                {
                    @if let (Some(name), Some(color)) = (
                        &transaction_with_category.category_name,
                        &transaction_with_category.category_color,
                    ) {
                        (category_badge(name, color))
                    } @else {
                        span class="text-gray-400 dark:text-gray-500" { "Uncategorised" }
                    }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &edit_url,
                            endpoints::DELETE_TRANSACTION,
                            transaction.id.as_i64(),
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
                    h1 class="text-xl font-bold" { "Transactions" }

                    a href=(new_transaction_route) class=(LINK_STYLE)
                    {
                        "Create Transaction"
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
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for transaction_with_category in transactions {
                                (table_row(transaction_with_category))
                            }

                            @if transactions.is_empty() {
                                tr
                                {
                                    td
                                        colspan="5"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No transactions recorded yet. "
                                        a href=(new_transaction_route) class=(LINK_STYLE)
                                        {
                                            "Record your first transaction"
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
        "Transactions",
        Some((
            StaleView::Transactions.refresh_event(),
            endpoints::TRANSACTIONS_VIEW,
        )),
        &content,
    )
}
