//! Fintrack is a web app for tracking personal spending: transactions,
//! spending categories, and per-category monthly budgets.
//!
//! This library provides an HTTP server that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod budget;
mod category;
mod change_notifier;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod routing;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use budget::{Budget, BudgetAmount, create_budget};
pub use category::{Category, CategoryColor, CategoryName, create_category};
pub use database_id::{BudgetId, CategoryId, TransactionId};
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use routing::build_router;
pub use transaction::{Transaction, TransactionBuilder, TransactionDescription, create_transaction};

use crate::{
    alert::AlertTemplate,
    internal_server_error::render_internal_server_error,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string was used to create a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// The string used to create a category color was not a hex color.
    #[error("{0:?} is not a valid color, expected a hex color such as #1a2b3c")]
    InvalidColor(String),

    /// A transaction description shorter than two characters was submitted.
    #[error("Description must be at least 2 characters long")]
    DescriptionTooShort,

    /// A zero or negative amount was used to create a budget.
    #[error("{0} is not a valid budget amount, the amount must be greater than zero")]
    NonPositiveAmount(f64),

    /// A category was submitted with a name that is already taken.
    #[error("A category named \"{0}\" already exists")]
    DuplicateCategoryName(String),

    /// A budget was submitted for a category that already has one.
    ///
    /// At most one budget may exist per category at any time.
    #[error("A budget for this category already exists")]
    DuplicateBudget,

    /// A category with referencing transactions was submitted for deletion.
    ///
    /// Categories are soft-referenced by transactions, so deleting one would
    /// leave dangling references. The transactions must be reassigned or
    /// deleted first.
    #[error(
        "Cannot delete a category with associated transactions. \
        Please reassign or delete those transactions first."
    )]
    CategoryInUse,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a category that does not exist
    #[error("tried to update a category that is not in the database")]
    UpdateMissingCategory,

    /// Tried to delete a category that does not exist
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,

    /// Tried to update a budget that does not exist
    #[error("tried to update a budget that is not in the database")]
    UpdateMissingBudget,

    /// Tried to delete a budget that does not exist
    #[error("tried to delete a budget that is not in the database")]
    DeleteMissingBudget,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed. The unique
            // index on budget.category_id backstops the pre-insert duplicate
            // check, so a race between two concurrent creates surfaces here.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("budget.category_id") =>
            {
                Error::DuplicateBudget
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error(Default::default())
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::DuplicateBudget => AlertTemplate::error(
                StatusCode::BAD_REQUEST,
                "Could not save budget",
                &Error::DuplicateBudget.to_string(),
            ),
            Error::DuplicateCategoryName(name) => AlertTemplate::error(
                StatusCode::BAD_REQUEST,
                "Could not save category",
                &Error::DuplicateCategoryName(name).to_string(),
            ),
            Error::CategoryInUse => AlertTemplate::error(
                StatusCode::BAD_REQUEST,
                "Could not delete category",
                &Error::CategoryInUse.to_string(),
            ),
            Error::UpdateMissingCategory => AlertTemplate::error(
                StatusCode::NOT_FOUND,
                "Could not update category",
                "The category could not be found.",
            ),
            Error::DeleteMissingCategory => AlertTemplate::error(
                StatusCode::NOT_FOUND,
                "Could not delete category",
                "The category could not be found. \
                Try refreshing the page to see if the category has already been deleted.",
            ),
            Error::UpdateMissingBudget => AlertTemplate::error(
                StatusCode::NOT_FOUND,
                "Could not update budget",
                "The budget could not be found.",
            ),
            Error::DeleteMissingBudget => AlertTemplate::error(
                StatusCode::NOT_FOUND,
                "Could not delete budget",
                "The budget could not be found. \
                Try refreshing the page to see if the budget has already been deleted.",
            ),
            Error::UpdateMissingTransaction => AlertTemplate::error(
                StatusCode::NOT_FOUND,
                "Could not update transaction",
                "The transaction could not be found.",
            ),
            Error::DeleteMissingTransaction => AlertTemplate::error(
                StatusCode::NOT_FOUND,
                "Could not delete transaction",
                "The transaction could not be found. \
                Try refreshing the page to see if the transaction has already been deleted.",
            ),
            _ => AlertTemplate::error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong",
                "An unexpected error occurred, check the server logs for more details.",
            ),
        }
    }
}
