//! Dashboard page summarising the current month's spending.
//!
//! Shows income, expense and net totals plus per-category spending against
//! budget, as plain numbers.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error,
    change_notifier::StaleView,
    endpoints,
    html::{
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        TABLE_SECTION_STYLE, TABLE_STYLE, base, category_badge, format_currency,
    },
    navigation::NavBar,
};

/// The state needed for the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Income, expense and net totals for one month.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct MonthTotals {
    income: f64,
    expense: f64,
}

impl MonthTotals {
    fn net(self) -> f64 {
        self.income + self.expense
    }
}

/// One category's spending for the month, with its budget when one exists.
#[derive(Debug, Clone, PartialEq)]
struct CategorySpending {
    category_name: String,
    category_color: String,
    spent: f64,
    budget: Option<f64>,
}

/// Render the dashboard page.
pub async fn get_dashboard_page(
    State(state): State<DashboardPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let today = OffsetDateTime::now_utc().date();
    let (month_start, month_end) = month_bounds(today);

    let totals = get_month_totals(month_start, month_end, &connection)
        .inspect_err(|error| tracing::error!("Failed to compute month totals: {error}"))?;

    let spending = get_category_spending(month_start, month_end, &connection)
        .inspect_err(|error| tracing::error!("Failed to compute category spending: {error}"))?;

    Ok(dashboard_view(today, totals, &spending).into_response())
}

/// The first and last day of `date`'s month.
fn month_bounds(date: Date) -> (Date, Date) {
    // replace_day(1) cannot fail, every month has a first day.
    let start = date
        .replace_day(1)
        .unwrap_or(date);
    let end_day = date.month().length(date.year());
    let end = date.replace_day(end_day).unwrap_or(date);

    (start, end)
}

fn get_month_totals(
    month_start: Date,
    month_end: Date,
    connection: &Connection,
) -> Result<MonthTotals, Error> {
    connection
        .prepare(
            "SELECT \
                COALESCE(SUM(CASE WHEN amount > 0 THEN amount ELSE 0 END), 0), \
                COALESCE(SUM(CASE WHEN amount < 0 THEN amount ELSE 0 END), 0) \
            FROM \"transaction\" WHERE date BETWEEN ?1 AND ?2;",
        )?
        .query_row([month_start, month_end], |row| {
            Ok(MonthTotals {
                income: row.get(0)?,
                expense: row.get(1)?,
            })
        })
        .map_err(|error| error.into())
}

fn get_category_spending(
    month_start: Date,
    month_end: Date,
    connection: &Connection,
) -> Result<Vec<CategorySpending>, Error> {
    connection
        .prepare(
            "SELECT c.name, c.color, \
                COALESCE((SELECT SUM(-t.amount) FROM \"transaction\" t \
                    WHERE t.category_id = c.id AND t.amount < 0 \
                    AND t.date BETWEEN ?1 AND ?2), 0), \
                (SELECT b.amount FROM budget b WHERE b.category_id = c.id) \
            FROM category c ORDER BY c.name ASC;",
        )?
        .query_map([month_start, month_end], |row| {
            Ok(CategorySpending {
                category_name: row.get(0)?,
                category_color: row.get(1)?,
                spent: row.get(2)?,
                budget: row.get(3)?,
            })
        })?
        .map(|maybe_row| maybe_row.map_err(|error| error.into()))
        .collect()
}

fn dashboard_view(today: Date, totals: MonthTotals, spending: &[CategorySpending]) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let summary_card = |label: &str, value: f64| {
        html!(
            div class="rounded border border-gray-200 bg-white px-6 py-4 shadow-sm \
                dark:border-gray-700 dark:bg-gray-800"
            {
                p class="text-sm text-gray-500 dark:text-gray-400" { (label) }
                p class="text-2xl font-semibold tabular-nums" { (format_currency(value)) }
            }
        )
    };

    let spending_row = |row: &CategorySpending| {
        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    (category_badge(&row.category_name, &row.category_color))
                }

                td class=(TABLE_CELL_STYLE) { (format_currency(row.spent)) }

                td class=(TABLE_CELL_STYLE)
                {
                    @if let Some(budget) = row.budget {
                        (format_currency(budget))
                    } @else {
                        span class="text-gray-400 dark:text-gray-500" { "No budget" }
                    }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    @if let Some(budget) = row.budget {
                        @let remaining = budget - row.spent;
                        @if remaining < 0.0 {
                            span class="text-red-600 dark:text-red-400"
                            {
                                (format_currency(remaining)) " over"
                            }
                        } @else {
                            span class="text-green-600 dark:text-green-400"
                            {
                                (format_currency(remaining)) " left"
                            }
                        }
                    } @else {
                        span class="text-gray-400 dark:text-gray-500" { "—" }
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-6"
            {
                header
                {
                    h1 class="text-xl font-bold" { "Dashboard" }
                    p class="text-sm text-gray-500 dark:text-gray-400"
                    {
                        "Summary for " (today.month()) " " (today.year())
                    }
                }

                div class="grid grid-cols-1 gap-4 sm:grid-cols-3"
                {
                    (summary_card("Income", totals.income))
                    (summary_card("Expenses", totals.expense))
                    (summary_card("Net", totals.net()))
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
                                th scope="col" class=(TABLE_CELL_STYLE) { "Spent" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Budget" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Remaining" }
                            }
                        }

                        tbody
                        {
                            @for row in spending {
                                (spending_row(row))
                            }

                            @if spending.is_empty() {
                                tr
                                {
                                    td
                                        colspan="4"
                                        class="px-6 py-4 text-center \
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No categories to summarise yet."
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
        "Dashboard",
        Some((
            StaleView::Dashboard.refresh_event(),
            endpoints::DASHBOARD_VIEW,
        )),
        &content,
    )
}
